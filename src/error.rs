//! Error types for project generation.
//!
//! Only project-level failures escape a generation call: a missing project, an
//! archive that cannot be written, a store that cannot be read. Per-file
//! failures ([`GenError::TemplateNotFound`], [`GenError::Render`]) are caught at
//! the emitter boundary and logged; they are part of this enum so that the
//! renderer can report them precisely.

use http::StatusCode;
use serde_json::{json, Value};

/// Errors that can occur while generating a project
#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("Project not found")]
    ProjectNotFound(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Failed to render template '{template}': {message}")]
    Render { template: String, message: String },

    #[error("Component '{component}' has a malformed schema: {message}")]
    MalformedComponentSchema { component: String, message: String },

    #[error("Components '{first}' and '{second}' both generate '{path}'")]
    DuplicateComponentName {
        path: String,
        first: String,
        second: String,
    },

    #[error("Failed to write archive: {0}")]
    ArchiveWrite(String),

    #[error("Store error: {0}")]
    Store(#[source] anyhow::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl GenError {
    /// HTTP status the request boundary should answer with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            GenError::ProjectNotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// JSON body the request boundary should answer with: `{"error": message}`.
    pub fn error_body(&self) -> Value {
        json!({ "error": self.to_string() })
    }

    /// True when the error only affects one generated file.
    pub fn is_file_scoped(&self) -> bool {
        matches!(
            self,
            GenError::TemplateNotFound(_)
                | GenError::Render { .. }
                | GenError::MalformedComponentSchema { .. }
        )
    }
}

impl From<zip::result::ZipError> for GenError {
    fn from(err: zip::result::ZipError) -> Self {
        GenError::ArchiveWrite(err.to_string())
    }
}

/// Result type alias for generation operations
pub type Result<T> = std::result::Result<T, GenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = GenError::ProjectNotFound("p-1".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_body(), json!({ "error": "Project not found" }));
        assert!(!err.is_file_scoped());
    }

    #[test]
    fn test_other_errors_map_to_500() {
        let err = GenError::ArchiveWrite("broken pipe".into());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.error_body(),
            json!({ "error": "Failed to write archive: broken pipe" })
        );
    }

    #[test]
    fn test_template_errors_are_file_scoped() {
        assert!(GenError::TemplateNotFound("element/entity.ts".into()).is_file_scoped());
        assert!(GenError::Render {
            template: "x".into(),
            message: "y".into()
        }
        .is_file_scoped());
    }
}
