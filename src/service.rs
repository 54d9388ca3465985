//! # Service Module
//!
//! The three request shapes an HTTP layer maps onto generation: `generate`
//! (summary only), `preview` (full content) and `download` (zip archive).
//! All three load the project the same way and fail with
//! [`GenError::ProjectNotFound`] for an unknown id, which the boundary turns
//! into a 404 through [`GenError::status_code`].

use std::io::{Seek, Write};

use crate::config::GeneratorConfig;
use crate::error::{GenError, Result};
use crate::generator::{GeneratedFile, ProjectGenerator};
use crate::model::Project;
use crate::sink::{write_archive, DownloadMeta, Preview, Summary};
use crate::store::ProjectStore;

#[derive(Debug)]
pub struct GenerationService<S> {
    store: S,
    generator: ProjectGenerator,
}

impl<S: ProjectStore> GenerationService<S> {
    pub fn new(store: S, generator: ProjectGenerator) -> Self {
        GenerationService { store, generator }
    }

    pub fn with_config(store: S, config: GeneratorConfig) -> Self {
        Self::new(store, ProjectGenerator::from_config(config))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn generator(&self) -> &ProjectGenerator {
        &self.generator
    }

    /// Load project `id` fresh from the store.
    pub fn project(&self, id: &str) -> Result<Project> {
        self.store
            .find_project(id)
            .map_err(GenError::Store)?
            .ok_or_else(|| GenError::ProjectNotFound(id.to_string()))
    }

    fn render(&self, project: &Project) -> Result<Vec<GeneratedFile>> {
        self.generator.generate(project)
    }

    /// Generate and report only paths and sizes.
    pub fn generate(&self, id: &str) -> Result<Summary> {
        let project = self.project(id)?;
        let files = self.render(&project)?;
        Ok(Summary::from_files(&files))
    }

    /// Generate and return every file with its content.
    pub fn preview(&self, id: &str) -> Result<Preview> {
        let project = self.project(id)?;
        Ok(Preview::from(self.render(&project)?))
    }

    /// Generate and stream a zip archive into `writer`.
    ///
    /// Nothing is written when the project does not exist.
    pub fn download<W: Write + Seek>(&self, id: &str, writer: W) -> Result<(DownloadMeta, W)> {
        let project = self.project(id)?;
        let files = self.render(&project)?;
        let writer = write_archive(&files, writer)?;
        tracing::info!(project = %project.id, files = files.len(), "archive ready");
        Ok((DownloadMeta::for_project(&project), writer))
    }
}
