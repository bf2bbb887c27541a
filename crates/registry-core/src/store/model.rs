//! Version store row types
//!
//! `ComponentVersion` is one row per `(component_id, version)`;
//! `HistoryRecord` is the append-only audit trail. Both serialize with
//! opaque `serde_json::Value` payloads; the store never interprets a
//! component's configuration.

use chrono::{DateTime, Utc};
use registry_meta::ComponentType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// One versioned configuration snapshot of a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentVersion {
    /// Stable identity of the governed component
    pub component_id: String,
    /// Immutable once the component's first version is created
    pub component_type: ComponentType,
    /// Positive, unique per component; monotonic but not contiguous
    pub version: u32,
    /// Opaque configuration payload
    pub config: Value,
    /// At most one active version per component
    pub is_active: bool,
    /// Soft-delete flag; versions are never physically removed
    pub is_deprecated: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ComponentVersion {
    /// Opaque snapshot of this row for the audit trail
    pub fn snapshot(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// What a history record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Created,
    Activated,
    Deprecated,
    ConfigUpdated,
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HistoryAction::Created => "created",
            HistoryAction::Activated => "activated",
            HistoryAction::Deprecated => "deprecated",
            HistoryAction::ConfigUpdated => "config_updated",
        };
        f.write_str(s)
    }
}

/// Which side of the system initiated a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncSource {
    /// A declarative file drove the change (sync pass)
    Yaml,
    /// The store drove the change (file rewrite)
    Db,
    /// An administrative caller drove the change
    Api,
}

impl fmt::Display for SyncSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SyncSource::Yaml => "yaml",
            SyncSource::Db => "db",
            SyncSource::Api => "api",
        };
        f.write_str(s)
    }
}

/// One append-only audit trail entry
///
/// References a version by `(component_id, version)`; the same pair
/// accumulates several records over its life (created, activated, ...).
/// Never mutated or deleted after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: Uuid,
    pub component_id: String,
    pub component_type: ComponentType,
    pub version: u32,
    pub action: HistoryAction,
    #[serde(default)]
    pub previous_state: Option<Value>,
    #[serde(default)]
    pub new_state: Option<Value>,
    pub changed_by: String,
    pub changed_at: DateTime<Utc>,
    #[serde(default)]
    pub reason: Option<String>,
    pub sync_source: SyncSource,
}

impl HistoryRecord {
    /// Build a record for a state transition on `version`.
    pub fn transition(
        version: &ComponentVersion,
        action: HistoryAction,
        previous_state: Option<Value>,
        changed_by: &str,
        reason: Option<&str>,
        sync_source: SyncSource,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            component_id: version.component_id.clone(),
            component_type: version.component_type,
            version: version.version,
            action,
            previous_state,
            new_state: Some(version.snapshot()),
            changed_by: changed_by.to_string(),
            changed_at: Utc::now(),
            reason: reason.map(str::to_string),
            sync_source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_version() -> ComponentVersion {
        ComponentVersion {
            component_id: "demo".to_string(),
            component_type: ComponentType::Agent,
            version: 1,
            config: json!({"agent": {"agent_id": "demo", "version": 1}}),
            is_active: true,
            is_deprecated: false,
            created_at: Utc::now(),
            created_by: "tester".to_string(),
            description: None,
        }
    }

    #[test]
    fn action_serializes_as_snake_case() {
        let json = serde_json::to_string(&HistoryAction::ConfigUpdated).unwrap();
        assert_eq!(json, "\"config_updated\"");
    }

    #[test]
    fn sync_source_round_trips() {
        for source in [SyncSource::Yaml, SyncSource::Db, SyncSource::Api] {
            let encoded = serde_json::to_string(&source).unwrap();
            let decoded: SyncSource = serde_json::from_str(&encoded).unwrap();
            assert_eq!(decoded, source);
        }
    }

    #[test]
    fn version_round_trips_through_json() {
        let version = sample_version();
        let encoded = serde_json::to_string(&version).unwrap();
        let decoded: ComponentVersion = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, version);
    }

    #[test]
    fn transition_snapshots_the_new_state() {
        let version = sample_version();
        let record = HistoryRecord::transition(
            &version,
            HistoryAction::Created,
            None,
            "tester",
            Some("initial import"),
            SyncSource::Yaml,
        );

        assert_eq!(record.action, HistoryAction::Created);
        assert_eq!(record.version, 1);
        assert!(record.previous_state.is_none());
        assert_eq!(record.new_state, Some(version.snapshot()));
        assert_eq!(record.reason.as_deref(), Some("initial import"));
    }
}
