use minijinja::context;
use serde::Serialize;

use super::files::GeneratedFile;
use super::views::{controller_target, ControllerView, ElementView, HelperView, WorkerView};
use crate::model::{Component, ComponentIndex, ComponentKind, ComponentSchema};
use crate::render::helpers::kebab_case;
use crate::render::Renderer;

/// Everything an emitter may look at besides its own component.
pub struct EmitContext<'a> {
    pub renderer: &'a Renderer,
    pub index: &'a ComponentIndex<'a>,
}

/// Turns one component into zero or more files.
///
/// Emitters never fail: a file whose template is missing or broken is logged
/// and left out (or replaced by a placeholder where one exists).
pub trait Emitter: Sync {
    /// Paths this emitter writes for `component`, in emit order.
    fn paths(&self, component: &Component, index: &ComponentIndex<'_>) -> Vec<String>;

    fn emit(&self, component: &Component, ctx: &EmitContext<'_>) -> Vec<GeneratedFile>;
}

/// Emitter for a component kind.
pub fn emitter_for(kind: ComponentKind) -> &'static dyn Emitter {
    match kind {
        ComponentKind::Element => &ElementEmitter,
        ComponentKind::Manipulator => &ManipulatorEmitter,
        ComponentKind::Worker => &WorkerEmitter,
        ComponentKind::Helper => &HelperEmitter,
        ComponentKind::Auth
        | ComponentKind::Auditor
        | ComponentKind::Enforcer
        | ComponentKind::Workflow => &RetainedSchemaEmitter,
    }
}

/// Render every file of one component.
pub fn generate_component(
    renderer: &Renderer,
    component: &Component,
    index: &ComponentIndex<'_>,
) -> Vec<GeneratedFile> {
    let ctx = EmitContext { renderer, index };
    let files = emitter_for(component.kind).emit(component, &ctx);
    tracing::debug!(
        component = %component.name,
        kind = %component.kind,
        files = files.len(),
        "emitted component"
    );
    files
}

/// File name stem for a name: its kebab form, else the component id's.
pub(crate) fn file_stem(name: &str, component: &Component) -> String {
    let stem = kebab_case(name);
    if !stem.is_empty() {
        return stem;
    }
    let stem = kebab_case(&component.id);
    if stem.is_empty() {
        "unnamed".to_string()
    } else {
        stem
    }
}

fn render_file<S: Serialize>(
    ctx: &EmitContext<'_>,
    component: &Component,
    template: &str,
    path: String,
    view: S,
) -> Option<GeneratedFile> {
    match ctx.renderer.render(template, view) {
        Ok(content) => {
            tracing::debug!(path = %path, template, "rendered file");
            Some(GeneratedFile::new(path, content))
        }
        Err(err) => {
            tracing::warn!(
                component = %component.name,
                path = %path,
                error = %err,
                "skipping file"
            );
            None
        }
    }
}

pub struct ElementEmitter;

impl ElementEmitter {
    pub fn entity_path(component: &Component) -> String {
        format!("src/entities/{}.entity.ts", file_stem(&component.name, component))
    }

    pub fn service_path(component: &Component) -> String {
        format!("src/services/{}.service.ts", file_stem(&component.name, component))
    }
}

impl Emitter for ElementEmitter {
    fn paths(&self, component: &Component, _index: &ComponentIndex<'_>) -> Vec<String> {
        vec![Self::entity_path(component), Self::service_path(component)]
    }

    fn emit(&self, component: &Component, ctx: &EmitContext<'_>) -> Vec<GeneratedFile> {
        let schema = match component.typed_schema() {
            ComponentSchema::Element(schema) => schema,
            _ => Default::default(),
        };
        let view = ElementView::new(component, &schema);
        [
            ("element/entity.ts", Self::entity_path(component)),
            ("element/service.ts", Self::service_path(component)),
        ]
        .into_iter()
        .filter_map(|(template, path)| {
            render_file(ctx, component, template, path, context! { element => &view })
        })
        .collect()
    }
}

pub struct ManipulatorEmitter;

impl ManipulatorEmitter {
    pub fn controller_path(component: &Component, index: &ComponentIndex<'_>) -> String {
        let schema = match component.typed_schema() {
            ComponentSchema::Manipulator(schema) => schema,
            _ => Default::default(),
        };
        let target = controller_target(component, &schema, index);
        format!("src/controllers/{}.controller.ts", file_stem(&target, component))
    }
}

impl Emitter for ManipulatorEmitter {
    fn paths(&self, component: &Component, index: &ComponentIndex<'_>) -> Vec<String> {
        vec![Self::controller_path(component, index)]
    }

    fn emit(&self, component: &Component, ctx: &EmitContext<'_>) -> Vec<GeneratedFile> {
        let schema = match component.typed_schema() {
            ComponentSchema::Manipulator(schema) => schema,
            _ => Default::default(),
        };
        if schema.linked_element.is_none() && schema.linked_element_id.is_none() {
            tracing::debug!(component = %component.name, "manipulator has no linked element");
        }
        let view = ControllerView::new(component, &schema, ctx.index);
        let path = Self::controller_path(component, ctx.index);
        render_file(
            ctx,
            component,
            "manipulator/controller.ts",
            path,
            context! { controller => &view },
        )
        .into_iter()
        .collect()
    }
}

pub struct WorkerEmitter;

impl WorkerEmitter {
    pub fn worker_path(component: &Component) -> String {
        format!("src/workers/{}.worker.ts", file_stem(&component.name, component))
    }
}

impl Emitter for WorkerEmitter {
    fn paths(&self, component: &Component, _index: &ComponentIndex<'_>) -> Vec<String> {
        vec![Self::worker_path(component)]
    }

    fn emit(&self, component: &Component, ctx: &EmitContext<'_>) -> Vec<GeneratedFile> {
        let schema = match component.typed_schema() {
            ComponentSchema::Worker(schema) => schema,
            _ => Default::default(),
        };
        let view = WorkerView::new(component, &schema);
        let path = Self::worker_path(component);
        let file = render_file(
            ctx,
            component,
            "worker/worker.ts",
            path.clone(),
            context! { worker => &view },
        )
        .unwrap_or_else(|| GeneratedFile::new(path, placeholder(&component.name, "worker")));
        vec![file]
    }
}

pub struct HelperEmitter;

impl HelperEmitter {
    pub fn helper_path(component: &Component) -> String {
        format!("src/helpers/{}.helper.ts", file_stem(&component.name, component))
    }
}

impl Emitter for HelperEmitter {
    fn paths(&self, component: &Component, _index: &ComponentIndex<'_>) -> Vec<String> {
        vec![Self::helper_path(component)]
    }

    fn emit(&self, component: &Component, ctx: &EmitContext<'_>) -> Vec<GeneratedFile> {
        let schema = match component.typed_schema() {
            ComponentSchema::Helper(schema) => schema,
            _ => Default::default(),
        };
        let view = HelperView::new(component, &schema);
        let path = Self::helper_path(component);
        let file = render_file(
            ctx,
            component,
            "helper/helper.ts",
            path.clone(),
            context! { helper => &view },
        )
        .unwrap_or_else(|| GeneratedFile::new(path, placeholder(&component.name, "helper")));
        vec![file]
    }
}

/// Minimal stub used when the worker/helper template cannot be rendered.
pub fn placeholder(name: &str, role: &str) -> String {
    format!("// {name} {role}\n// TODO: implement\n")
}

/// Auth, auditor, enforcer and workflow components produce no source file.
/// Their schema stays on the component for other consumers.
pub struct RetainedSchemaEmitter;

impl Emitter for RetainedSchemaEmitter {
    fn paths(&self, _component: &Component, _index: &ComponentIndex<'_>) -> Vec<String> {
        Vec::new()
    }

    fn emit(&self, component: &Component, _ctx: &EmitContext<'_>) -> Vec<GeneratedFile> {
        if let Err(err) = component.try_typed_schema() {
            tracing::warn!(component = %component.name, error = %err, "malformed schema retained as-is");
        }
        tracing::debug!(
            component = %component.name,
            kind = %component.kind,
            "no source files for this kind"
        );
        Vec::new()
    }
}
