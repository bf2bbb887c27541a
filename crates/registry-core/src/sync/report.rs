//! Sync pass reporting types

use std::fmt;

use registry_meta::ComponentType;
use serde::{Deserialize, Serialize};

/// Outcome of reconciling one component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Component was unknown to the store; file adopted as the first version
    Created,
    /// File was ahead; the store adopted the file's version
    Updated,
    /// Store was ahead; the file was rewritten from the store
    YamlUpdated,
    /// Equal versions with differing configs; file corrected from the store
    YamlCorrected,
    /// Both sides already agreed; nothing written anywhere
    NoChange,
    /// Pass deadline expired before this component was reached
    Skipped,
    /// Reconciliation of this component failed; see the message
    Error,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncStatus::Created => "created",
            SyncStatus::Updated => "updated",
            SyncStatus::YamlUpdated => "yaml_updated",
            SyncStatus::YamlCorrected => "yaml_corrected",
            SyncStatus::NoChange => "no_change",
            SyncStatus::Skipped => "skipped",
            SyncStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Per-component row of a sync report
#[derive(Debug, Clone, Serialize)]
pub struct ComponentSyncResult {
    pub component_id: String,
    pub component_type: ComponentType,
    pub status: SyncStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A discovered file that could not be reconciled at all
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFileReport {
    pub path: String,
    pub reason: String,
}

/// Report from one sync pass
#[derive(Debug, Default, Serialize)]
pub struct SyncReport {
    /// One row per discovered component, in discovery order
    pub results: Vec<ComponentSyncResult>,
    /// Files skipped before reconciliation (parse/validation failures)
    pub skipped_files: Vec<SkippedFileReport>,
}

impl SyncReport {
    pub fn record(
        &mut self,
        component_id: impl Into<String>,
        component_type: ComponentType,
        status: SyncStatus,
        message: Option<String>,
    ) {
        self.results.push(ComponentSyncResult {
            component_id: component_id.into(),
            component_type,
            status,
            message,
        });
    }

    /// Number of results with the given status
    pub fn count(&self, status: SyncStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn has_errors(&self) -> bool {
        self.count(SyncStatus::Error) > 0
    }

    /// True when every component reconciled without writing anything
    pub fn is_converged(&self) -> bool {
        self.results
            .iter()
            .all(|r| r.status == SyncStatus::NoChange)
    }
}
