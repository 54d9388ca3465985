use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{GenError, Result};

/// Component templates compiled into the binary, keyed by template id.
pub const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "element/entity.ts",
        include_str!("../../templates/components/element_entity.ts.j2"),
    ),
    (
        "element/service.ts",
        include_str!("../../templates/components/element_service.ts.j2"),
    ),
    (
        "manipulator/controller.ts",
        include_str!("../../templates/components/manipulator_controller.ts.j2"),
    ),
    (
        "worker/worker.ts",
        include_str!("../../templates/components/worker.ts.j2"),
    ),
    (
        "helper/helper.ts",
        include_str!("../../templates/components/helper.ts.j2"),
    ),
    (
        "project/model.prisma",
        include_str!("../../templates/components/model.prisma.j2"),
    ),
    (
        "project/README.md",
        include_str!("../../templates/components/README.md.j2"),
    ),
];

/// Where template sources come from.
///
/// Lookup order is the override directory (a file at `<dir>/<template id>`),
/// then the built-in set. Sources read from disk are cached for the life of
/// the store; templates are static assets and never change at runtime.
#[derive(Debug)]
pub struct TemplateStore {
    override_dir: Option<PathBuf>,
    builtins: bool,
    cache: DashMap<String, Arc<str>>,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TemplateStore {
    pub fn new(override_dir: Option<PathBuf>, builtins: bool) -> Self {
        TemplateStore {
            override_dir,
            builtins,
            cache: DashMap::new(),
        }
    }

    /// Built-in templates only.
    pub fn builtin() -> Self {
        Self::new(None, true)
    }

    /// Files in `dir` take precedence over the built-in templates.
    pub fn with_override_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(Some(dir.into()), true)
    }

    /// Only the files in `dir`; ids without a file are missing.
    pub fn from_dir_only(dir: impl Into<PathBuf>) -> Self {
        Self::new(Some(dir.into()), false)
    }

    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    /// Source text for `id`, or [`GenError::TemplateNotFound`].
    pub fn source(&self, id: &str) -> Result<Arc<str>> {
        if let Some(cached) = self.cache.get(id) {
            return Ok(Arc::clone(cached.value()));
        }
        if let Some(dir) = &self.override_dir {
            let path = dir.join(id);
            if path.is_file() {
                let text = std::fs::read_to_string(&path).map_err(|err| GenError::Render {
                    template: id.to_string(),
                    message: format!("failed to read {}: {err}", path.display()),
                })?;
                let text: Arc<str> = Arc::from(text);
                tracing::debug!(template = id, path = %path.display(), "loaded template override");
                self.cache.insert(id.to_string(), Arc::clone(&text));
                return Ok(text);
            }
        }
        if self.builtins {
            if let Some((_, source)) = BUILTIN_TEMPLATES.iter().find(|(name, _)| *name == id) {
                return Ok(Arc::from(*source));
            }
        }
        Err(GenError::TemplateNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.source(id).is_ok()
    }
}
