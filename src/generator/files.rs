use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{GenError, Result};

/// One output file: a relative `/`-separated path and its full text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        GeneratedFile {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Byte length of the content.
    pub fn size(&self) -> usize {
        self.content.len()
    }
}

/// Who produced a file, for collision reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner<'a> {
    pub id: &'a str,
    pub name: &'a str,
}

impl<'a> Owner<'a> {
    pub const PROJECT: Owner<'static> = Owner {
        id: "",
        name: "project",
    };

    pub fn new(id: &'a str, name: &'a str) -> Self {
        Owner { id, name }
    }
}

/// Ordered output list with one entry per path.
///
/// A second file for an existing path replaces the first in place, so the
/// list keeps the position of the first writer and the content of the last.
/// With `strict` set, a collision between two different owners is an error
/// instead.
#[derive(Debug, Default)]
pub struct GeneratedFiles {
    files: Vec<GeneratedFile>,
    owners: HashMap<String, (usize, String, String)>,
    strict: bool,
}

impl GeneratedFiles {
    pub fn new(strict: bool) -> Self {
        GeneratedFiles {
            strict,
            ..Default::default()
        }
    }

    pub fn push(&mut self, owner: Owner<'_>, file: GeneratedFile) -> Result<()> {
        if let Some((index, first_id, first_name)) = self.owners.get(&file.path) {
            let index = *index;
            if first_id != owner.id {
                if self.strict {
                    return Err(GenError::DuplicateComponentName {
                        path: file.path,
                        first: first_name.clone(),
                        second: owner.name.to_string(),
                    });
                }
                tracing::warn!(
                    path = %file.path,
                    first = %first_name,
                    second = owner.name,
                    "two components generate the same path, keeping the last"
                );
            }
            self.owners.insert(
                file.path.clone(),
                (index, owner.id.to_string(), owner.name.to_string()),
            );
            self.files[index] = file;
            return Ok(());
        }
        self.owners.insert(
            file.path.clone(),
            (self.files.len(), owner.id.to_string(), owner.name.to_string()),
        );
        self.files.push(file);
        Ok(())
    }

    pub fn extend(
        &mut self,
        owner: Owner<'_>,
        files: impl IntoIterator<Item = GeneratedFile>,
    ) -> Result<()> {
        for file in files {
            self.push(owner, file)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn into_vec(self) -> Vec<GeneratedFile> {
        self.files
    }
}
