//! Resolution API
//!
//! The single read path external factories are permitted to use: given a
//! component identity and an optional version number, return the
//! authoritative configuration document. Factories never touch the store
//! directly.

use serde_json::Value;

use crate::service::VersionService;
use crate::Result;

/// Resolves configuration documents for external consumers
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    service: VersionService,
}

impl ConfigResolver {
    pub fn new(service: VersionService) -> Self {
        Self { service }
    }

    /// Fetch a component's config document.
    ///
    /// With `version` set this is an exact lookup (`VersionNotFound` on a
    /// miss); without it the active version answers (`NoActiveVersion`
    /// when the component exists but nothing is active).
    pub fn resolve(&self, component_id: &str, version: Option<u32>) -> Result<Value> {
        let resolved = match version {
            Some(version) => self.service.get_version(component_id, version)?,
            None => self.service.get_active_version(component_id)?,
        };
        Ok(resolved.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::NewVersion;
    use crate::store::{SyncSource, VersionStore};
    use crate::Error;
    use registry_meta::ComponentType;
    use serde_json::json;
    use tempfile::tempdir;

    fn service_with_demo() -> (tempfile::TempDir, VersionService) {
        let dir = tempdir().unwrap();
        let service = VersionService::new(VersionStore::open(dir.path()).unwrap());
        service
            .create_version(NewVersion {
                component_id: "demo".to_string(),
                component_type: ComponentType::Agent,
                version: 1,
                config: json!({"agent": {"agent_id": "demo", "version": 1}}),
                created_by: "tester".to_string(),
                description: None,
                is_active: true,
                sync_source: SyncSource::Api,
            })
            .unwrap();
        (dir, service)
    }

    #[test]
    fn resolves_active_version_by_default() {
        let (_dir, service) = service_with_demo();
        let resolver = ConfigResolver::new(service);

        let config = resolver.resolve("demo", None).unwrap();
        assert_eq!(config["agent"]["agent_id"], json!("demo"));
    }

    #[test]
    fn resolves_exact_version_when_given() {
        let (_dir, service) = service_with_demo();
        let resolver = ConfigResolver::new(service);

        assert!(resolver.resolve("demo", Some(1)).is_ok());
        assert!(matches!(
            resolver.resolve("demo", Some(9)),
            Err(Error::VersionNotFound { .. })
        ));
    }

    #[test]
    fn unknown_component_is_not_found() {
        let (_dir, service) = service_with_demo();
        let resolver = ConfigResolver::new(service);

        assert!(matches!(
            resolver.resolve("ghost", None),
            Err(Error::ComponentNotFound { .. })
        ));
    }
}
