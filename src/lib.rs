//! # canvasgen
//!
//! **canvasgen** turns a visually composed component graph into a runnable
//! backend source tree: TypeScript on Express with a Prisma data layer.
//!
//! ## Overview
//!
//! A [`Project`] holds an ordered list of typed [`Component`]s (elements,
//! manipulators, workers, helpers, ...), each carrying a free-form schema. The
//! generator reads that graph fresh from a [`ProjectStore`], renders one or
//! more files per component plus the project-level scaffolding, and hands the
//! result to one of three sinks: a preview, a size summary, or a zip archive.
//!
//! ## Architecture
//!
//! - **[`model`]** - projects, components and the typed schema of each kind
//! - **[`render`]** - minijinja template registry with the naming helpers
//! - **[`generator`]** - per-kind emitters, askama scaffolding and the project orchestrator
//! - **[`sink`]** - preview, summary and zip output
//! - **[`store`]** - where projects come from (in memory or a directory of documents)
//! - **[`service`]** - `generate` / `preview` / `download` over a store
//! - **[`linter`]** - component graph checks ahead of generation
//! - **[`locked`]** - tests implied by a locked component's schema
//! - **[`config`]** / **[`logging`]** / **[`cli`]** - ambient plumbing for the binary
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Caller
//!     participant Service as service::GenerationService
//!     participant Store as store::ProjectStore
//!     participant Gen as generator::ProjectGenerator
//!     participant Emit as generator::Emitter
//!     participant Sink as sink
//!
//!     Caller->>Service: download("p1", writer)
//!     Service->>Store: find_project("p1")
//!     Store-->>Service: Project (components in stored order)
//!     Service->>Gen: generate(&project)
//!     Gen->>Gen: package.json, tsconfig, README, .env, prisma schema
//!     loop each component
//!         Gen->>Emit: emitter_for(kind).emit(component)
//!         Emit-->>Gen: GeneratedFile[] (failed files left out)
//!     end
//!     Gen->>Gen: src/index.ts, Dockerfile, docker-compose.yml
//!     Gen-->>Service: Vec<GeneratedFile>
//!     Service->>Sink: write_archive(files, writer)
//!     Sink-->>Caller: (DownloadMeta, writer)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use canvasgen::model::{Component, ComponentKind, Project};
//! use canvasgen::service::GenerationService;
//! use canvasgen::store::MemoryStore;
//! use canvasgen::config::GeneratorConfig;
//! use serde_json::json;
//!
//! let project = Project::new("p1", "Blog")
//!     .with_component(
//!         Component::new("c1", ComponentKind::Element, "Post").with_schema(json!({
//!             "properties": [{ "name": "title", "type": "string", "required": true }]
//!         })),
//!     )
//!     .with_component(
//!         Component::new("c2", ComponentKind::Manipulator, "Posts API")
//!             .with_schema(json!({ "linkedElement": "Post" })),
//!     );
//!
//! let service = GenerationService::with_config(
//!     MemoryStore::with_projects([project]),
//!     GeneratorConfig::default(),
//! );
//! let summary = service.generate("p1").unwrap();
//! assert!(summary.files.iter().any(|f| f.path == "src/controllers/post.controller.ts"));
//! assert!(service.generate("missing").is_err());
//! ```
//!
//! ## Failure Policy
//!
//! A missing project, a failing store and a broken archive writer fail the
//! whole call. A template that is missing or fails to render only costs its
//! own file, which is logged and left out (workers and helpers fall back to a
//! stub).

pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod linter;
pub mod locked;
pub mod logging;
pub mod model;
pub mod render;
pub mod service;
pub mod sink;
pub mod store;

pub use config::GeneratorConfig;
pub use error::{GenError, Result};
pub use generator::{GeneratedFile, ProjectGenerator};
pub use model::{Component, ComponentKind, Project};
pub use service::GenerationService;
pub use store::{FsStore, MemoryStore, ProjectStore};
