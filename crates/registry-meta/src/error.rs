//! Error types for registry-meta

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] registry_fs::Error),

    #[error("Failed to parse document at {path}: {message}")]
    DocumentParse { path: PathBuf, message: String },

    #[error("Document at {path} has no '{section}' section")]
    MissingSection { path: PathBuf, section: String },

    #[error("Document at {path} is missing required field '{field}'")]
    MissingField { path: PathBuf, field: String },

    #[error("Document at {path} has an invalid version: {message}")]
    InvalidVersion { path: PathBuf, message: String },

    #[error("Failed to render document: {message}")]
    Render { message: String },

    #[error("Unknown component type: {value}")]
    UnknownComponentType { value: String },
}

impl Error {
    /// Whether this error means the document is structurally unusable
    /// (missing identity, section, or version) rather than unreadable.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::MissingSection { .. } | Error::MissingField { .. } | Error::InvalidVersion { .. }
        )
    }
}
