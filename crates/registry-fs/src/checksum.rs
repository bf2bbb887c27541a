//! SHA-256 checksum utilities
//!
//! One canonical checksum format (`sha256:<hex>`) used across the
//! workspace for backup integrity verification.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::{Error, Result};

const PREFIX: &str = "sha256:";

/// Compute the SHA-256 checksum of string content in `sha256:<hex>` form.
pub fn compute_content_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Compute the SHA-256 checksum of a file's contents in `sha256:<hex>` form.
pub fn compute_file_checksum(path: &Path) -> Result<String> {
    let content = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    let mut hasher = Sha256::new();
    hasher.update(&content);
    Ok(format!("{}{:x}", PREFIX, hasher.finalize()))
}
