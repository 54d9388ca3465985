//! # Render Module
//!
//! Text templating for component files.
//!
//! A [`Renderer`] wraps one `minijinja` environment configured once at startup
//! with the helper library from [`helpers`]. It is passed by reference to every
//! emitter; there is no global template registry.
//!
//! ## Template language
//!
//! - `{{ element.name }}` interpolates a dotted path. A missing path at any
//!   depth renders as the empty string.
//! - `{% if flag %}...{% endif %}` renders a block when the value is truthy.
//! - `{% for p in properties %}...{% endfor %}` renders a block per element.
//! - Helpers are callable as functions (`{{ kebabCase(name) }}`) or filters
//!   (`{{ name | kebab_case }}`):
//!
//! | Function | Filter | Result for `"Blog Post"` / `"integer"` |
//! |----------|--------|----------------------------------------|
//! | `kebabCase` | `kebab_case` | `blog-post` |
//! | `pascalCase` | `pascal_case` | `BlogPost` |
//! | `camelCase` | `camel_case` | `blogPost` |
//! | `pluralize` | `pluralize` | `Blog Posts` |
//! | `schemaType` | `schema_type` | `Int` |
//! | `hostType` | `host_type` | `number` |
//!
//! ## Example
//!
//! ```rust
//! use canvasgen::render::Renderer;
//! use serde_json::json;
//!
//! let renderer = Renderer::builtin();
//! let out = renderer
//!     .render_str("export class {{ pascalCase(name) }} {}", json!({ "name": "blog post" }))
//!     .unwrap();
//! assert_eq!(out, "export class BlogPost {}");
//! ```

pub mod helpers;
mod templates;

use minijinja::{AutoEscape, Environment, UndefinedBehavior, Value};
use serde::Serialize;

use crate::error::{GenError, Result};

pub use templates::{TemplateStore, BUILTIN_TEMPLATES};

/// Template renderer shared by all emitters of a process.
pub struct Renderer {
    env: Environment<'static>,
    templates: TemplateStore,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("templates", &self.templates)
            .finish_non_exhaustive()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Renderer {
    pub fn new(templates: TemplateStore) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Chainable);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        register_helpers(&mut env);
        Renderer { env, templates }
    }

    /// Renderer over the built-in templates.
    pub fn builtin() -> Self {
        Self::new(TemplateStore::builtin())
    }

    pub fn templates(&self) -> &TemplateStore {
        &self.templates
    }

    /// Render template `id` against `ctx`.
    ///
    /// # Errors
    ///
    /// [`GenError::TemplateNotFound`] when no source exists for `id`,
    /// [`GenError::Render`] when the source fails to parse or evaluate.
    pub fn render<S: Serialize>(&self, id: &str, ctx: S) -> Result<String> {
        let source = self.templates.source(id)?;
        self.env
            .render_named_str(id, &source, ctx)
            .map_err(|err| render_error(id, &err))
    }

    /// Render an inline template source against `ctx`.
    pub fn render_str<S: Serialize>(&self, source: &str, ctx: S) -> Result<String> {
        self.env
            .render_named_str("<inline>", source, ctx)
            .map_err(|err| render_error("<inline>", &err))
    }
}

fn render_error(id: &str, err: &minijinja::Error) -> GenError {
    GenError::Render {
        template: id.to_string(),
        message: err.to_string(),
    }
}

/// Template values as plain text: undefined and none become `""`.
fn text(value: &Value) -> String {
    if value.is_undefined() || value.is_none() {
        return String::new();
    }
    match value.as_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

fn register_helpers(env: &mut Environment<'static>) {
    type Helper = fn(&str) -> String;
    let table: [(&str, &str, Helper); 6] = [
        ("kebabCase", "kebab_case", helpers::kebab_case),
        ("pascalCase", "pascal_case", helpers::pascal_case),
        ("camelCase", "camel_case", helpers::camel_case),
        ("pluralize", "pluralize", helpers::pluralize),
        ("schemaType", "schema_type", |tag: &str| {
            helpers::schema_type(tag).to_string()
        }),
        ("hostType", "host_type", |tag: &str| {
            helpers::host_type(tag).to_string()
        }),
    ];
    for (function, filter, helper) in table {
        env.add_function(function, move |value: Value| helper(&text(&value)));
        env.add_filter(filter, move |value: Value| helper(&text(&value)));
    }
}
