//! # Model Module
//!
//! Projects, components and the typed per-kind views of a component's schema.
//!
//! Records arrive from a [`crate::store::ProjectStore`] exactly as persisted.
//! The raw `schema` JSON of every component is kept untouched; emitters work
//! on [`ComponentSchema`], a typed view read on demand:
//!
//! ```rust
//! use canvasgen::model::{Component, ComponentKind, ComponentSchema};
//! use serde_json::json;
//!
//! let post = Component::new("c1", ComponentKind::Element, "Blog Post")
//!     .with_schema(json!({ "properties": [{ "name": "title", "type": "string" }] }));
//!
//! match post.typed_schema() {
//!     ComponentSchema::Element(element) => assert_eq!(element.properties.len(), 1),
//!     _ => unreachable!(),
//! }
//! ```

mod index;
mod project;
mod schema;
#[cfg(test)]
mod tests;

pub use index::ComponentIndex;
pub use project::{Component, ComponentKind, ComponentStatus, Position, Project};
pub use schema::*;
