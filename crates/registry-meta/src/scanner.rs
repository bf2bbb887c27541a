//! Discovery of declarative files under a content root
//!
//! Layout convention, one directory per component:
//!
//! ```text
//! <content root>/
//!   agents/
//!     pagbank-specialist/config.yaml
//!   teams/
//!     ana/config.yaml
//!   workflows/
//!     escalation/config.yaml
//! ```
//!
//! Identity always comes from inside the document, never from the path.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::{ComponentDocument, ComponentType, Result};

/// Candidate file names inside a component directory
const DOCUMENT_NAMES: [&str; 2] = ["config.yaml", "config.yml"];

/// A discovered file that could not be used, with the reason
#[derive(Debug, Clone)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of one discovery walk
#[derive(Debug, Default)]
pub struct Discovery {
    pub documents: Vec<ComponentDocument>,
    pub skipped: Vec<SkippedFile>,
}

impl Discovery {
    fn absorb(&mut self, other: Discovery) {
        self.documents.extend(other.documents);
        self.skipped.extend(other.skipped);
    }
}

/// Enumerates declarative component files on disk
#[derive(Debug, Clone)]
pub struct DocumentScanner {
    content_root: PathBuf,
}

impl DocumentScanner {
    pub fn new(content_root: impl Into<PathBuf>) -> Self {
        Self {
            content_root: content_root.into(),
        }
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }

    /// Canonical path for a component's declarative file
    pub fn component_path(&self, component_type: ComponentType, component_id: &str) -> PathBuf {
        self.content_root
            .join(component_type.dir_name())
            .join(component_type.short_identity(component_id))
            .join(DOCUMENT_NAMES[0])
    }

    /// Discover every declarative file across all component types.
    ///
    /// Unusable files are collected into `skipped` with a warning; they
    /// never abort the walk.
    pub fn scan(&self) -> Discovery {
        let mut discovery = Discovery::default();
        for ty in ComponentType::ALL {
            discovery.absorb(self.scan_type(ty));
        }
        discovery
    }

    /// Discover declarative files of one component type.
    pub fn scan_type(&self, component_type: ComponentType) -> Discovery {
        let mut discovery = Discovery::default();
        let type_dir = self.content_root.join(component_type.dir_name());
        if !type_dir.is_dir() {
            return discovery;
        }

        let entries = match fs::read_dir(&type_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %type_dir.display(), error = %e, "skipping unreadable type directory");
                discovery.skipped.push(SkippedFile {
                    path: type_dir,
                    reason: e.to_string(),
                });
                return discovery;
            }
        };

        let mut component_dirs: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_dir())
            .collect();
        component_dirs.sort();

        for dir in component_dirs {
            let Some(file) = Self::document_in(&dir) else {
                continue;
            };
            match ComponentDocument::load(&file, component_type) {
                Ok(doc) => discovery.documents.push(doc),
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "skipping unusable document");
                    discovery.skipped.push(SkippedFile {
                        path: file,
                        reason: e.to_string(),
                    });
                }
            }
        }

        discovery
    }

    /// Find a single component's document by identity, across all types.
    pub fn find(&self, component_id: &str) -> Result<Option<ComponentDocument>> {
        let discovery = self.scan();
        Ok(discovery
            .documents
            .into_iter()
            .find(|doc| doc.component_id == component_id))
    }

    fn document_in(dir: &Path) -> Option<PathBuf> {
        DOCUMENT_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_path_uses_short_identity() {
        let scanner = DocumentScanner::new("/data");
        let path = scanner.component_path(ComponentType::Team, "ana-team");
        assert_eq!(path, PathBuf::from("/data/teams/ana/config.yaml"));
    }

    #[test]
    fn scan_of_empty_root_finds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let discovery = DocumentScanner::new(dir.path()).scan();
        assert!(discovery.documents.is_empty());
        assert!(discovery.skipped.is_empty());
    }
}
