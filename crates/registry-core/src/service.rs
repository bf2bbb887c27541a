//! Version Service
//!
//! Lifecycle operations on the version store. Every mutation runs inside
//! one store transaction and appends its audit record in the same
//! transaction, so the trail can never diverge from the table.

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use registry_meta::ComponentType;

use crate::store::{
    ComponentVersion, HistoryAction, HistoryRecord, SyncSource, VersionStore,
};
use crate::{Error, Result};

/// Request to create a new component version
#[derive(Debug, Clone)]
pub struct NewVersion {
    pub component_id: String,
    pub component_type: ComponentType,
    pub version: u32,
    pub config: Value,
    pub created_by: String,
    pub description: Option<String>,
    /// When set, every other version of the component is deactivated in
    /// the same transaction as the insert.
    pub is_active: bool,
    pub sync_source: SyncSource,
}

/// CRUD and lifecycle operations over the version store
#[derive(Debug, Clone)]
pub struct VersionService {
    store: VersionStore,
}

impl VersionService {
    pub fn new(store: VersionStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &VersionStore {
        &self.store
    }

    /// Create a new version row.
    ///
    /// Fails with `AlreadyExists` if `(component_id, version)` is taken,
    /// and with `InvalidState` if the component was first created with a
    /// different type.
    pub fn create_version(&self, request: NewVersion) -> Result<ComponentVersion> {
        let created = self.store.mutate(|state| {
            if state
                .find(&request.component_id, request.version)
                .is_some()
            {
                return Err(Error::AlreadyExists {
                    component_id: request.component_id.clone(),
                    version: request.version,
                });
            }

            if let Some(existing) = state.component_type_of(&request.component_id)
                && existing != request.component_type
            {
                return Err(Error::invalid_state(format!(
                    "component '{}' is a {}, not a {}",
                    request.component_id, existing, request.component_type
                )));
            }

            let previous = if request.is_active {
                state.deactivate_all(&request.component_id)
            } else {
                None
            };

            let row = ComponentVersion {
                component_id: request.component_id.clone(),
                component_type: request.component_type,
                version: request.version,
                config: request.config.clone(),
                is_active: request.is_active,
                is_deprecated: false,
                created_at: Utc::now(),
                created_by: request.created_by.clone(),
                description: request.description.clone(),
            };

            state.record(HistoryRecord::transition(
                &row,
                HistoryAction::Created,
                previous.map(|p| p.snapshot()),
                &request.created_by,
                request.description.as_deref(),
                request.sync_source,
            ));
            state.insert(row.clone());
            Ok(row)
        })?;

        info!(
            component_id = %created.component_id,
            version = created.version,
            active = created.is_active,
            source = %request.sync_source,
            "version created"
        );
        Ok(created)
    }

    /// Exact version lookup.
    pub fn get_version(&self, component_id: &str, version: u32) -> Result<ComponentVersion> {
        let state = self.store.load()?;
        state
            .find(component_id, version)
            .cloned()
            .ok_or_else(|| Error::VersionNotFound {
                component_id: component_id.to_string(),
                version,
            })
    }

    /// The single active version of a component.
    ///
    /// Distinguishes an unknown component (`ComponentNotFound`) from a
    /// known one with nothing active (`NoActiveVersion`).
    pub fn get_active_version(&self, component_id: &str) -> Result<ComponentVersion> {
        let state = self.store.load()?;
        if let Some(active) = state.active(component_id) {
            return Ok(active.clone());
        }
        if state.contains_component(component_id) {
            Err(Error::NoActiveVersion {
                component_id: component_id.to_string(),
            })
        } else {
            Err(Error::ComponentNotFound {
                component_id: component_id.to_string(),
            })
        }
    }

    /// All versions of a component, newest version first.
    pub fn list_versions(
        &self,
        component_id: &str,
        include_deprecated: bool,
    ) -> Result<Vec<ComponentVersion>> {
        let state = self.store.load()?;
        Ok(state
            .list(component_id, include_deprecated)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Make `version` the single active version of the component.
    ///
    /// Deactivation of all other versions and activation of the target
    /// happen in one transaction; concurrent activations serialize on the
    /// store lock and the later one simply wins.
    pub fn activate_version(
        &self,
        component_id: &str,
        version: u32,
        changed_by: &str,
        reason: Option<&str>,
        sync_source: SyncSource,
    ) -> Result<ComponentVersion> {
        let activated = self.store.mutate(|state| {
            let target = state.find(component_id, version).cloned().ok_or_else(|| {
                Error::VersionNotFound {
                    component_id: component_id.to_string(),
                    version,
                }
            })?;

            if target.is_deprecated {
                // Rollback escape hatch: permitted, but worth noticing.
                warn!(
                    component_id = %component_id,
                    version = version,
                    "activating a deprecated version"
                );
            }

            let previous = state.deactivate_all(component_id);

            let row = state
                .find_mut(component_id, version)
                .expect("target row existed under the same lock");
            row.is_active = true;
            let row = row.clone();

            state.record(HistoryRecord::transition(
                &row,
                HistoryAction::Activated,
                previous.map(|p| p.snapshot()),
                changed_by,
                reason,
                sync_source,
            ));
            Ok(row)
        })?;

        info!(component_id = %component_id, version = version, "version activated");
        Ok(activated)
    }

    /// Soft-delete a version.
    ///
    /// Fails with `InvalidState` while the version is active: a different
    /// version must be activated first.
    pub fn deprecate_version(
        &self,
        component_id: &str,
        version: u32,
        changed_by: &str,
        reason: Option<&str>,
    ) -> Result<ComponentVersion> {
        let deprecated = self.store.mutate(|state| {
            let target = state.find(component_id, version).cloned().ok_or_else(|| {
                Error::VersionNotFound {
                    component_id: component_id.to_string(),
                    version,
                }
            })?;

            if target.is_active {
                return Err(Error::invalid_state(format!(
                    "version {} of '{}' is active; activate another version first",
                    version, component_id
                )));
            }

            let previous = target.snapshot();
            let row = state
                .find_mut(component_id, version)
                .expect("target row existed under the same lock");
            row.is_deprecated = true;
            let row = row.clone();

            state.record(HistoryRecord::transition(
                &row,
                HistoryAction::Deprecated,
                Some(previous),
                changed_by,
                reason,
                SyncSource::Api,
            ));
            Ok(row)
        })?;

        info!(component_id = %component_id, version = version, "version deprecated");
        Ok(deprecated)
    }

    /// Replace the config payload of an existing version in place.
    ///
    /// Does not bump the version number; the audit record carries both
    /// the old and the new payload.
    pub fn update_config(
        &self,
        component_id: &str,
        version: u32,
        config: Value,
        changed_by: &str,
        reason: Option<&str>,
        sync_source: SyncSource,
    ) -> Result<ComponentVersion> {
        let updated = self.store.mutate(|state| {
            let target = state.find(component_id, version).cloned().ok_or_else(|| {
                Error::VersionNotFound {
                    component_id: component_id.to_string(),
                    version,
                }
            })?;

            let previous = target.snapshot();
            let row = state
                .find_mut(component_id, version)
                .expect("target row existed under the same lock");
            row.config = config.clone();
            let row = row.clone();

            state.record(HistoryRecord::transition(
                &row,
                HistoryAction::ConfigUpdated,
                Some(previous),
                changed_by,
                reason,
                sync_source,
            ));
            Ok(row)
        })?;

        info!(component_id = %component_id, version = version, "config updated");
        Ok(updated)
    }

    /// Deep-copy a source version's config into a new, inactive version.
    ///
    /// The copy is taken and inserted under one transaction, so later
    /// mutation of either version never affects the other.
    pub fn clone_version(
        &self,
        component_id: &str,
        source_version: u32,
        target_version: u32,
        created_by: &str,
        description: Option<&str>,
    ) -> Result<ComponentVersion> {
        let cloned = self.store.mutate(|state| {
            let source = state
                .find(component_id, source_version)
                .cloned()
                .ok_or_else(|| Error::VersionNotFound {
                    component_id: component_id.to_string(),
                    version: source_version,
                })?;

            if state.find(component_id, target_version).is_some() {
                return Err(Error::AlreadyExists {
                    component_id: component_id.to_string(),
                    version: target_version,
                });
            }

            let description = description
                .map(str::to_string)
                .unwrap_or_else(|| format!("Cloned from version {}", source_version));

            let row = ComponentVersion {
                component_id: component_id.to_string(),
                component_type: source.component_type,
                version: target_version,
                config: source.config,
                is_active: false,
                is_deprecated: false,
                created_at: Utc::now(),
                created_by: created_by.to_string(),
                description: Some(description.clone()),
            };

            state.record(HistoryRecord::transition(
                &row,
                HistoryAction::Created,
                None,
                created_by,
                Some(&description),
                SyncSource::Api,
            ));
            state.insert(row.clone());
            Ok(row)
        })?;

        info!(
            component_id = %component_id,
            source = source_version,
            target = target_version,
            "version cloned"
        );
        Ok(cloned)
    }

    /// Audit trail for a component, newest first.
    pub fn get_history(
        &self,
        component_id: &str,
        version: Option<u32>,
    ) -> Result<Vec<HistoryRecord>> {
        let state = self.store.load()?;
        Ok(state
            .history(component_id, version)
            .into_iter()
            .cloned()
            .collect())
    }
}
