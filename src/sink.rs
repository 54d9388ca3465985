//! # Output Sinks
//!
//! Three ways to hand a generated file list to a caller:
//!
//! - [`Preview`]: every file with its content, for display.
//! - [`Summary`]: file count plus path and byte size per file.
//! - [`write_archive`]: a zip stream written straight into any seekable writer.

use http::header::{HeaderMap, HeaderValue, InvalidHeaderValue, CONTENT_DISPOSITION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::{Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::Result;
use crate::generator::GeneratedFile;
use crate::model::Project;

/// Deflate level used for archives.
pub const ARCHIVE_COMPRESSION_LEVEL: i64 = 9;

pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    pub files: Vec<GeneratedFile>,
}

impl From<Vec<GeneratedFile>> for Preview {
    fn from(files: Vec<GeneratedFile>) -> Self {
        Preview { files }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSize {
    pub path: String,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub file_count: usize,
    pub files: Vec<FileSize>,
}

impl Summary {
    pub fn from_files(files: &[GeneratedFile]) -> Self {
        Summary {
            file_count: files.len(),
            files: files
                .iter()
                .map(|f| FileSize {
                    path: f.path.clone(),
                    size: f.size(),
                })
                .collect(),
        }
    }

    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.size).sum()
    }
}

/// Write `files` as a zip archive into `writer` and return the writer.
///
/// Entry names are the file paths verbatim. Parent directories get their own
/// entries ahead of the first file inside them. Entries are streamed one at a
/// time; the archive is never assembled in memory.
///
/// # Errors
///
/// [`GenError::ArchiveWrite`](crate::error::GenError::ArchiveWrite) when the
/// writer fails.
pub fn write_archive<W: Write + Seek>(files: &[GeneratedFile], writer: W) -> Result<W> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(ARCHIVE_COMPRESSION_LEVEL))
        .unix_permissions(0o644);
    let dir_options = SimpleFileOptions::default().unix_permissions(0o755);

    let mut zip = ZipWriter::new(writer);
    let mut dirs: HashSet<String> = HashSet::new();
    for file in files {
        for dir in parent_dirs(&file.path) {
            if dirs.insert(dir.to_string()) {
                zip.add_directory(format!("{dir}/"), dir_options)?;
            }
        }
        zip.start_file(file.path.as_str(), options)?;
        zip.write_all(file.content.as_bytes())
            .map_err(zip::result::ZipError::Io)?;
        tracing::trace!(path = %file.path, bytes = file.size(), "archived file");
    }
    let writer = zip.finish()?;
    tracing::debug!(files = files.len(), directories = dirs.len(), "archive written");
    Ok(writer)
}

/// `a/b/c.txt` → `a`, `a/b`
fn parent_dirs(path: &str) -> impl Iterator<Item = &str> {
    path.match_indices('/')
        .map(move |(i, _)| &path[..i])
        .filter(|dir| !dir.is_empty())
}

/// Response metadata for an archive download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadMeta {
    pub file_name: String,
    pub content_type: String,
    pub content_disposition: String,
}

impl DownloadMeta {
    /// `<project name>.zip` as an attachment.
    pub fn for_project(project: &Project) -> Self {
        let file_name = format!("{}.zip", project.name);
        let quoted: String = file_name
            .chars()
            .filter(|c| !c.is_control())
            .flat_map(|c| match c {
                '"' | '\\' => vec!['\\', c],
                c => vec![c],
            })
            .collect();
        DownloadMeta {
            content_disposition: format!("attachment; filename=\"{quoted}\""),
            content_type: ARCHIVE_CONTENT_TYPE.to_string(),
            file_name,
        }
    }

    pub fn headers(&self) -> std::result::Result<HeaderMap, InvalidHeaderValue> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(&self.content_type)?);
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_bytes(self.content_disposition.as_bytes())?,
        );
        Ok(headers)
    }
}
