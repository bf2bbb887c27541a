//! The persisted registry state document
//!
//! Two logical tables (component versions and the audit trail) held in
//! one serde document. Queries answer by `(component_id, version)` and by
//! `(component_id, is_active)`; mutation helpers keep the single-active
//! invariant local to one place.

use registry_meta::ComponentType;
use serde::{Deserialize, Serialize};

use crate::store::model::{ComponentVersion, HistoryRecord};

/// Persisted store contents: both tables plus a format version
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryState {
    /// State document format version for forward compatibility
    pub schema_version: String,
    versions: Vec<ComponentVersion>,
    history: Vec<HistoryRecord>,
}

impl Default for RegistryState {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryState {
    pub fn new() -> Self {
        Self {
            schema_version: "1.0".to_string(),
            versions: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Exact `(component_id, version)` lookup
    pub fn find(&self, component_id: &str, version: u32) -> Option<&ComponentVersion> {
        self.versions
            .iter()
            .find(|v| v.component_id == component_id && v.version == version)
    }

    pub fn find_mut(&mut self, component_id: &str, version: u32) -> Option<&mut ComponentVersion> {
        self.versions
            .iter_mut()
            .find(|v| v.component_id == component_id && v.version == version)
    }

    /// The single active version of a component, if any
    pub fn active(&self, component_id: &str) -> Option<&ComponentVersion> {
        self.versions
            .iter()
            .find(|v| v.component_id == component_id && v.is_active)
    }

    /// Whether any version of the component exists
    pub fn contains_component(&self, component_id: &str) -> bool {
        self.versions.iter().any(|v| v.component_id == component_id)
    }

    /// The type the component was first created with
    pub fn component_type_of(&self, component_id: &str) -> Option<ComponentType> {
        self.versions
            .iter()
            .find(|v| v.component_id == component_id)
            .map(|v| v.component_type)
    }

    /// All versions of a component, newest version first
    pub fn list(&self, component_id: &str, include_deprecated: bool) -> Vec<&ComponentVersion> {
        let mut versions: Vec<&ComponentVersion> = self
            .versions
            .iter()
            .filter(|v| v.component_id == component_id)
            .filter(|v| include_deprecated || !v.is_deprecated)
            .collect();
        versions.sort_by(|a, b| b.version.cmp(&a.version));
        versions
    }

    /// Clear the active flag on every version of a component.
    ///
    /// Returns the previously active row, snapshotted before the change.
    pub fn deactivate_all(&mut self, component_id: &str) -> Option<ComponentVersion> {
        let previous = self.active(component_id).cloned();
        for version in self
            .versions
            .iter_mut()
            .filter(|v| v.component_id == component_id)
        {
            version.is_active = false;
        }
        previous
    }

    pub fn insert(&mut self, version: ComponentVersion) {
        self.versions.push(version);
    }

    /// Append to the audit trail. Records are never mutated or removed.
    pub fn record(&mut self, record: HistoryRecord) {
        self.history.push(record);
    }

    /// Audit trail for a component, newest first, optionally one version only
    pub fn history(&self, component_id: &str, version: Option<u32>) -> Vec<&HistoryRecord> {
        self.history
            .iter()
            .filter(|h| h.component_id == component_id)
            .filter(|h| version.is_none_or(|v| h.version == v))
            .rev()
            .collect()
    }

    /// Every distinct component in the store
    pub fn component_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.versions.iter().map(|v| v.component_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}
