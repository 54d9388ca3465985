use anyhow::Context;
use std::path::{Path, PathBuf};

use super::ProjectStore;
use crate::model::Project;

const EXTENSIONS: &[&str] = &["json", "yaml", "yml"];

/// Projects stored as one document per project in a directory:
/// `<dir>/<id>.json`, `<dir>/<id>.yaml` or `<dir>/<id>.yml`.
///
/// Documents use the camelCase record layout with components inline, in
/// stored order. Files are read on every lookup.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Document path for `id`, if one exists.
    fn locate(&self, id: &str) -> Option<PathBuf> {
        // Ids are file stems, never paths.
        if id.is_empty() || id.contains(['/', '\\']) || id == "." || id == ".." {
            return None;
        }
        EXTENSIONS
            .iter()
            .map(|ext| self.root.join(format!("{id}.{ext}")))
            .find(|path| path.is_file())
    }

    /// Ids of every project document in the directory, sorted.
    pub fn project_ids(&self) -> anyhow::Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list {}", self.root.display()))?;
        let mut ids = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let known = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| EXTENSIONS.contains(&e));
            if let (true, Some(stem)) = (known, path.file_stem().and_then(|s| s.to_str())) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        ids.dedup();
        Ok(ids)
    }
}

/// Parse a project document; the format follows the file extension.
pub fn read_project_file(path: &Path) -> anyhow::Result<Project> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read project file: {}", path.display()))?;
    let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
    let project = if is_json {
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse project file: {}", path.display()))?
    } else {
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse project file: {}", path.display()))?
    };
    Ok(project)
}

impl ProjectStore for FsStore {
    fn find_project(&self, id: &str) -> anyhow::Result<Option<Project>> {
        let Some(path) = self.locate(id) else {
            tracing::debug!(project = id, root = %self.root.display(), "no project document");
            return Ok(None);
        };
        let mut project = read_project_file(&path)?;
        if project.id.is_empty() {
            project.id = id.to_string();
        }
        Ok(Some(project))
    }
}
