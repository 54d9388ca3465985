#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

//! Shared fixtures for integration tests.

use canvasgen::config::GeneratorConfig;
use canvasgen::model::{Component, ComponentKind, Project};
use serde_json::json;
use std::path::{Path, PathBuf};

pub mod fixtures {
    use super::*;

    /// Config without the README timestamp, so output is byte-stable.
    pub fn stable_config() -> GeneratorConfig {
        GeneratorConfig {
            readme_timestamp: false,
            ..Default::default()
        }
    }

    /// A project touching every emitter: two related elements, a linked and an
    /// unlinked manipulator, a worker, a helper and the schema-only kinds.
    pub fn blog_project() -> Project {
        Project::new("blog", "Blog Platform")
            .with_description("Posts, authors and a weekly digest")
            .with_component(
                Component::new("c-author", ComponentKind::Element, "Author").with_schema(json!({
                    "properties": [
                        { "name": "display name", "type": "string", "required": true },
                        { "name": "email", "type": "email", "unique": true }
                    ],
                    "relationships": [{ "type": "hasMany", "target": "Blog Post" }]
                })),
            )
            .with_component(
                Component::new("c-post", ComponentKind::Element, "Blog Post").with_schema(json!({
                    "properties": [
                        { "name": "title", "type": "string", "required": true, "min": 3, "max": 120 },
                        { "name": "status", "type": "enum", "values": ["draft", "published"] },
                        { "name": "views", "type": "integer", "default": 0 }
                    ],
                    "relationships": [{ "type": "belongsTo", "target": "Author" }],
                    "behaviors": ["timestamps", "softDelete"]
                })),
            )
            .with_component(
                Component::new("c-posts-api", ComponentKind::Manipulator, "Posts API")
                    .with_schema(json!({
                        "linkedElement": "Blog Post",
                        "endpoints": [{ "method": "post", "path": "/:id/publish" }]
                    })),
            )
            .with_component(
                Component::new("c-health", ComponentKind::Manipulator, "Status Probe")
                    .with_schema(json!({ "endpoints": [{ "method": "get", "path": "/ping" }] })),
            )
            .with_component(
                Component::new("c-digest", ComponentKind::Worker, "Weekly Digest").with_schema(
                    json!({
                        "queue": "mail",
                        "schedule": "0 8 * * MON",
                        "steps": [{ "name": "collect posts" }, { "name": "send mail" }],
                        "retry": { "maxAttempts": 5 }
                    }),
                ),
            )
            .with_component(
                Component::new("c-slug", ComponentKind::Helper, "Slug Utils").with_schema(json!({
                    "methods": [{
                        "name": "slugify",
                        "params": [{ "name": "text", "type": "string" }],
                        "returns": "string"
                    }]
                })),
            )
            .with_component(
                Component::new("c-auth", ComponentKind::Auth, "Login")
                    .with_schema(json!({ "strategy": "jwt", "roles": ["admin"] })),
            )
            .with_component(
                Component::new("c-audit", ComponentKind::Auditor, "Audit Trail")
                    .with_schema(json!({ "events": [{ "name": "post published" }] })),
            )
    }

    /// Write `project` as `<dir>/<id>.json` and return the path.
    pub fn write_project(dir: &Path, project: &Project) -> PathBuf {
        let path = dir.join(format!("{}.json", project.id));
        std::fs::write(&path, serde_json::to_string_pretty(project).unwrap()).unwrap();
        path
    }
}
