use chrono::{SecondsFormat, Utc};
use minijinja::context;
use serde::Serialize;

use super::emitters::{file_stem, generate_component};
use super::files::{GeneratedFile, GeneratedFiles, Owner};
use super::scaffold::{self, RouteMount};
use super::views::{ControllerView, ElementView};
use crate::config::GeneratorConfig;
use crate::error::{GenError, Result};
use crate::model::{ComponentIndex, ComponentKind, ComponentSchema, Project};
use crate::render::{Renderer, TemplateStore};
use crate::store::ProjectStore;

/// Renders whole projects.
///
/// Holds only configuration: the renderer and settings are built once and
/// shared by every call. Project data is read fresh from the store each time.
#[derive(Debug)]
pub struct ProjectGenerator {
    renderer: Renderer,
    config: GeneratorConfig,
}

impl Default for ProjectGenerator {
    fn default() -> Self {
        Self::from_config(GeneratorConfig::default())
    }
}

#[derive(Serialize)]
struct ReadmeComponent<'a> {
    name: &'a str,
    kind: &'static str,
}

#[derive(Serialize)]
struct ReadmeRoute {
    name: String,
    mount_path: String,
}

impl ProjectGenerator {
    pub fn new(renderer: Renderer, config: GeneratorConfig) -> Self {
        ProjectGenerator { renderer, config }
    }

    /// Generator whose templates come from `config.template_dir` (if set)
    /// over the built-in set.
    pub fn from_config(config: GeneratorConfig) -> Self {
        let templates = match &config.template_dir {
            Some(dir) => TemplateStore::with_override_dir(dir),
            None => TemplateStore::builtin(),
        };
        Self::new(Renderer::new(templates), config)
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Load project `id` from `store` and render it.
    ///
    /// # Errors
    ///
    /// [`GenError::ProjectNotFound`] when the store has no such project,
    /// [`GenError::Store`] when the store fails, and
    /// [`GenError::DuplicateComponentName`] under `strict_names`.
    pub fn generate_project<S: ProjectStore + ?Sized>(
        &self,
        store: &S,
        id: &str,
    ) -> Result<Vec<GeneratedFile>> {
        let project = store
            .find_project(id)
            .map_err(GenError::Store)?
            .ok_or_else(|| GenError::ProjectNotFound(id.to_string()))?;
        self.generate(&project)
    }

    /// Render `project` into its full file list.
    pub fn generate(&self, project: &Project) -> Result<Vec<GeneratedFile>> {
        tracing::info!(
            project = %project.id,
            components = project.components.len(),
            "generating project"
        );
        let index = ComponentIndex::new(&project.components);
        let mut files = GeneratedFiles::new(self.config.strict_names);
        let owner = Owner::PROJECT;

        // Manifest
        push_scaffold(&mut files, "package.json", scaffold::package_json(project, &self.config))?;
        push_scaffold(&mut files, "tsconfig.json", scaffold::tsconfig())?;

        // README
        let routes = self.route_mounts(project, &index);
        if let Some(readme) = self.readme(project, &routes) {
            files.push(owner, GeneratedFile::new("README.md", readme))?;
        }

        // Environment template
        push_scaffold(&mut files, ".env.example", scaffold::env_example(project, &self.config))?;

        // Consolidated data model
        let models = self.prisma_models(project);
        push_scaffold(
            &mut files,
            "prisma/schema.prisma",
            scaffold::prisma_schema(project, models),
        )?;

        // Components, in stored order
        for component in &project.components {
            let emitted = generate_component(&self.renderer, component, &index);
            files.extend(Owner::new(&component.id, &component.name), emitted)?;
        }

        // Entrypoint
        push_scaffold(
            &mut files,
            "src/index.ts",
            scaffold::entrypoint(project, &self.config, routes),
        )?;

        // Containers
        push_scaffold(&mut files, "Dockerfile", scaffold::dockerfile(&self.config))?;
        push_scaffold(
            &mut files,
            "docker-compose.yml",
            scaffold::compose(project, &self.config),
        )?;

        tracing::info!(project = %project.id, files = files.len(), "generated project");
        Ok(files.into_vec())
    }

    /// One `model` block per element, in stored order. A block that fails to
    /// render is left out.
    fn prisma_models(&self, project: &Project) -> Vec<String> {
        project
            .components_of(ComponentKind::Element)
            .filter_map(|component| {
                let schema = match component.typed_schema() {
                    ComponentSchema::Element(schema) => schema,
                    _ => Default::default(),
                };
                let view = ElementView::new(component, &schema);
                match self
                    .renderer
                    .render("project/model.prisma", context! { element => &view })
                {
                    Ok(model) => Some(model.trim_end().to_string()),
                    Err(err) => {
                        tracing::warn!(
                            component = %component.name,
                            error = %err,
                            "omitting model from schema"
                        );
                        None
                    }
                }
            })
            .collect()
    }

    /// Routers mounted by the entrypoint, one per controller file. A later
    /// manipulator writing the same controller file replaces the earlier mount.
    fn route_mounts(&self, project: &Project, index: &ComponentIndex<'_>) -> Vec<RouteMount> {
        let mut mounts: Vec<RouteMount> = Vec::new();
        for component in project.components_of(ComponentKind::Manipulator) {
            let schema = match component.typed_schema() {
                ComponentSchema::Manipulator(schema) => schema,
                _ => Default::default(),
            };
            let view = ControllerView::new(component, &schema, index);
            let mount = RouteMount {
                router_name: view.router_name,
                file_stem: file_stem(&view.names.name, component),
                mount_path: view.mount_path,
            };
            match mounts.iter_mut().find(|m| m.file_stem == mount.file_stem) {
                Some(existing) => *existing = mount,
                None => mounts.push(mount),
            }
        }
        mounts
    }

    fn readme(&self, project: &Project, routes: &[RouteMount]) -> Option<String> {
        let components: Vec<ReadmeComponent<'_>> = project
            .components
            .iter()
            .map(|c| ReadmeComponent {
                name: &c.name,
                kind: c.kind.as_str(),
            })
            .collect();
        let routes: Vec<ReadmeRoute> = routes
            .iter()
            .map(|r| ReadmeRoute {
                name: r.router_name.clone(),
                mount_path: r.mount_path.clone(),
            })
            .collect();
        let generated_at = self
            .config
            .readme_timestamp
            .then(|| Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        let ctx = context! {
            project => context! {
                name => &project.name,
                description => project.description(),
            },
            generated_at => generated_at,
            port => self.config.default_port,
            routes => routes,
            components => components,
        };
        match self.renderer.render("project/README.md", ctx) {
            Ok(readme) => Some(readme),
            Err(err) => {
                tracing::warn!(project = %project.id, error = %err, "skipping README");
                None
            }
        }
    }
}

/// Add a scaffold file, or log and skip it when it failed to render.
fn push_scaffold(files: &mut GeneratedFiles, path: &str, rendered: Result<String>) -> Result<()> {
    match rendered {
        Ok(content) => files.push(Owner::PROJECT, GeneratedFile::new(path, content)),
        Err(err) => {
            tracing::warn!(path, error = %err, "skipping file");
            Ok(())
        }
    }
}
