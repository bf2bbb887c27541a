//! Error types for registry-core

use std::path::PathBuf;

/// Result type for registry-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in registry-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Creating a version number that already exists for a component
    #[error("Version {version} already exists for component '{component_id}'")]
    AlreadyExists { component_id: String, version: u32 },

    /// A specific version lookup missed
    #[error("Version {version} of component '{component_id}' not found")]
    VersionNotFound { component_id: String, version: u32 },

    /// The component has no versions at all
    #[error("Component not found: '{component_id}'")]
    ComponentNotFound { component_id: String },

    /// The component exists but no version is active
    #[error("No active version for component '{component_id}'")]
    NoActiveVersion { component_id: String },

    /// Illegal lifecycle transition
    #[error("Invalid state: {message}")]
    InvalidState { message: String },

    /// The persisted state document could not be decoded
    #[error("Registry state at {path} is corrupt: {message}")]
    StateCorrupt { path: PathBuf, message: String },

    /// Cross-process lock could not be acquired
    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    // Transparent wrappers for underlying crate errors
    /// Filesystem error from registry-fs
    #[error(transparent)]
    Fs(#[from] registry_fs::Error),

    /// Document error from registry-meta
    #[error(transparent)]
    Meta(#[from] registry_meta::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML serialization error
    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

impl Error {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }
}
