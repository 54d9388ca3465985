//! # Store Module
//!
//! Where projects come from. The generator only reads: it asks a
//! [`ProjectStore`] for one project with its components, in stored order,
//! every time it runs.

mod fs;
mod memory;
#[cfg(test)]
mod tests;

pub use fs::{read_project_file, FsStore};
pub use memory::MemoryStore;

use crate::model::Project;

/// Read access to persisted projects.
pub trait ProjectStore {
    /// The project with `id` and all of its components, or `None` when no such
    /// project exists.
    ///
    /// # Errors
    ///
    /// Fails when the backing storage cannot be read.
    fn find_project(&self, id: &str) -> anyhow::Result<Option<Project>>;
}

impl<S: ProjectStore + ?Sized> ProjectStore for &S {
    fn find_project(&self, id: &str) -> anyhow::Result<Option<Project>> {
        (**self).find_project(id)
    }
}

impl<S: ProjectStore + ?Sized> ProjectStore for std::sync::Arc<S> {
    fn find_project(&self, id: &str) -> anyhow::Result<Option<Project>> {
        (**self).find_project(id)
    }
}
