//! # Generator Module
//!
//! Turns a [`Project`](crate::model::Project) into a flat, ordered list of
//! [`GeneratedFile`]s for an Express + Prisma backend written in TypeScript.
//!
//! ## Architecture
//!
//! ```text
//! Project → ComponentIndex → Emitters (minijinja, per component)  ─┐
//!        └→ Scaffold (askama, project-level files)               ─┴→ GeneratedFiles
//! ```
//!
//! Project-level scaffolding is compiled in with Askama. Component files are
//! rendered at runtime through the [`Renderer`](crate::render::Renderer), so a
//! template directory can replace any of them without rebuilding.
//!
//! ## Generated Structure
//!
//! ```text
//! package.json                      # manifest, fixed dependency list
//! tsconfig.json
//! README.md                         # name, description, one bullet per component
//! .env.example                      # PORT default
//! prisma/schema.prisma              # one model per element
//! src/
//! ├── entities/<element>.entity.ts
//! ├── services/<element>.service.ts
//! ├── controllers/<linked element>.controller.ts
//! ├── workers/<worker>.worker.ts
//! ├── helpers/<helper>.helper.ts
//! └── index.ts                      # health route, router mounts
//! Dockerfile                        # multi-stage build
//! docker-compose.yml
//! ```
//!
//! Every file name stem is the kebab-case form of a component name, so paths
//! never contain spaces or uppercase letters.
//!
//! ## Failure policy
//!
//! Only project-level failures escape: a missing project, a failing store,
//! and (with `strict_names`) two components claiming one path. A file whose
//! template is missing or broken is logged and left out; workers and helpers
//! fall back to a `// TODO: implement` stub.
//!
//! ## Usage
//!
//! ```rust
//! use canvasgen::generator::ProjectGenerator;
//! use canvasgen::model::{Component, ComponentKind, Project};
//!
//! let project = Project::new("p1", "Blog")
//!     .with_component(Component::new("c1", ComponentKind::Element, "Blog Post"));
//!
//! let files = ProjectGenerator::default().generate(&project).unwrap();
//! assert!(files.iter().any(|f| f.path == "src/entities/blog-post.entity.ts"));
//! ```

mod emitters;
mod files;
mod project;
mod scaffold;
mod views;

pub use emitters::{
    emitter_for, generate_component, placeholder, EmitContext, Emitter, ElementEmitter,
    HelperEmitter, ManipulatorEmitter, RetainedSchemaEmitter, WorkerEmitter,
};
pub use files::{GeneratedFile, GeneratedFiles, Owner};
pub use project::ProjectGenerator;
pub use scaffold::{package_name, BASE_DEPENDENCIES, BASE_DEV_DEPENDENCIES};
pub use views::{
    controller_target, ControllerView, ElementView, HelperView, NameView, OperationsView,
    PropertyView, RelationView, WorkerView,
};
