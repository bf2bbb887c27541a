//! SyncEngine implementation
//!
//! Converges the version store with declarative files, component by
//! component. On conflict the store is authoritative; a file can only
//! move the store forward by declaring a higher version.

use std::fs::{File, OpenOptions};
use std::time::Instant;

use fs2::FileExt;
use tracing::{info, warn};

use registry_meta::{ComponentDocument, DocumentScanner, render_config};

use crate::backup::FileBackup;
use crate::service::{NewVersion, VersionService};
use crate::store::SyncSource;
use crate::sync::report::{SkippedFileReport, SyncReport, SyncStatus};
use crate::{Error, Result};

/// Actor recorded in the audit trail for sync-driven mutations
const SYNC_ACTOR: &str = "sync-engine";

/// Options for a sync pass
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Report what would happen without writing to disk or the store
    pub dry_run: bool,
    /// Checked between components; components not reached are `skipped`
    pub deadline: Option<Instant>,
}

/// Engine reconciling declarative files against the version store
pub struct SyncEngine {
    scanner: DocumentScanner,
    service: VersionService,
    backups: FileBackup,
}

impl SyncEngine {
    pub fn new(scanner: DocumentScanner, service: VersionService) -> Self {
        let backups = FileBackup::new(service.store().state_dir().join("backups"));
        Self {
            scanner,
            service,
            backups,
        }
    }

    /// Override how many file backups are retained per component.
    pub fn with_backup_retention(mut self, retain: usize) -> Self {
        self.backups = self.backups.with_retention(retain);
        self
    }

    pub fn service(&self) -> &VersionService {
        &self.service
    }

    /// Run one full reconciliation pass over every discovered component.
    ///
    /// Holds an exclusive cross-process lock for the whole pass, so
    /// concurrent passes serialize rather than interleave. Per-component
    /// failures are collected into the report and never abort the pass.
    pub fn sync_all(&self, options: &SyncOptions) -> Result<SyncReport> {
        let _pass_lock = self.acquire_pass_lock()?;

        let discovery = self.scanner.scan();
        let mut report = SyncReport::default();
        report.skipped_files = discovery
            .skipped
            .iter()
            .map(|s| SkippedFileReport {
                path: s.path.display().to_string(),
                reason: s.reason.clone(),
            })
            .collect();

        for doc in &discovery.documents {
            if options.deadline.is_some_and(|d| Instant::now() >= d) {
                warn!(component_id = %doc.component_id, "sync deadline expired");
                report.record(
                    doc.component_id.clone(),
                    doc.component_type,
                    SyncStatus::Skipped,
                    Some("pass deadline expired".to_string()),
                );
                continue;
            }

            match self.sync_document(doc, options) {
                Ok((status, message)) => {
                    info!(
                        component_id = %doc.component_id,
                        status = %status,
                        "component reconciled"
                    );
                    report.record(doc.component_id.clone(), doc.component_type, status, message);
                }
                Err(e) => {
                    warn!(
                        component_id = %doc.component_id,
                        error = %e,
                        "component sync failed"
                    );
                    report.record(
                        doc.component_id.clone(),
                        doc.component_type,
                        SyncStatus::Error,
                        Some(e.to_string()),
                    );
                }
            }
        }

        Ok(report)
    }

    /// Force-sync one component by identity.
    pub fn sync_component(&self, component_id: &str, options: &SyncOptions) -> Result<SyncReport> {
        let _pass_lock = self.acquire_pass_lock()?;

        let doc = self
            .scanner
            .find(component_id)?
            .ok_or_else(|| Error::ComponentNotFound {
                component_id: component_id.to_string(),
            })?;

        let mut report = SyncReport::default();
        match self.sync_document(&doc, options) {
            Ok((status, message)) => {
                report.record(doc.component_id.clone(), doc.component_type, status, message)
            }
            Err(e) => report.record(
                doc.component_id.clone(),
                doc.component_type,
                SyncStatus::Error,
                Some(e.to_string()),
            ),
        }
        Ok(report)
    }

    /// Apply the decision table to one discovered document.
    fn sync_document(
        &self,
        doc: &ComponentDocument,
        options: &SyncOptions,
    ) -> Result<(SyncStatus, Option<String>)> {
        match self.service.get_active_version(&doc.component_id) {
            // Unknown component: the file seeds the store.
            Err(Error::ComponentNotFound { .. }) => {
                self.adopt_from_file(doc, options)?;
                Ok((SyncStatus::Created, None))
            }

            // Known component, nothing active (all versions were parked).
            // Converge on the file's version without losing either side.
            Err(Error::NoActiveVersion { .. }) => {
                if self.version_exists(doc)? {
                    if !options.dry_run {
                        self.service.activate_version(
                            &doc.component_id,
                            doc.version,
                            SYNC_ACTOR,
                            Some("re-activated from declarative file"),
                            SyncSource::Yaml,
                        )?;
                    }
                } else {
                    self.adopt_from_file(doc, options)?;
                }
                Ok((SyncStatus::Updated, None))
            }

            Ok(active) => {
                if doc.version > active.version {
                    if self.version_exists(doc)? {
                        // The store already holds this version and chose to
                        // activate another one (rollback); the file is
                        // stale, not ahead.
                        self.rewrite_file(doc, &active.config, active.version, options)?;
                        Ok((
                            SyncStatus::YamlUpdated,
                            Some(format!("file rewritten to version {}", active.version)),
                        ))
                    } else {
                        // File is ahead; the store adopts it.
                        self.adopt_from_file(doc, options)?;
                        Ok((SyncStatus::Updated, None))
                    }
                } else if active.version > doc.version {
                    // Store is ahead; the file is stale.
                    self.rewrite_file(doc, &active.config, active.version, options)?;
                    Ok((
                        SyncStatus::YamlUpdated,
                        Some(format!("file rewritten to version {}", active.version)),
                    ))
                } else if doc.config == active.config {
                    // True no-op; nothing written anywhere.
                    Ok((SyncStatus::NoChange, None))
                } else {
                    // Same version, different content: the store wins.
                    self.rewrite_file(doc, &active.config, active.version, options)?;
                    Ok((
                        SyncStatus::YamlCorrected,
                        Some("file content corrected from store".to_string()),
                    ))
                }
            }

            Err(e) => Err(e),
        }
    }

    fn version_exists(&self, doc: &ComponentDocument) -> Result<bool> {
        match self.service.get_version(&doc.component_id, doc.version) {
            Ok(_) => Ok(true),
            Err(Error::VersionNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Create the file's declared version in the store, active.
    fn adopt_from_file(&self, doc: &ComponentDocument, options: &SyncOptions) -> Result<()> {
        if options.dry_run {
            return Ok(());
        }
        self.service.create_version(NewVersion {
            component_id: doc.component_id.clone(),
            component_type: doc.component_type,
            version: doc.version,
            config: doc.config.clone(),
            created_by: SYNC_ACTOR.to_string(),
            description: Some(format!("Imported from {}", doc.path.display())),
            is_active: true,
            sync_source: SyncSource::Yaml,
        })?;
        Ok(())
    }

    /// Rewrite the declarative file from the store's config.
    ///
    /// The original is backed up first; if the write fails the backup is
    /// restored before the error propagates.
    fn rewrite_file(
        &self,
        doc: &ComponentDocument,
        config: &serde_json::Value,
        version: u32,
        options: &SyncOptions,
    ) -> Result<()> {
        let rendered = render_config(config, doc.component_type, version)?;
        if options.dry_run {
            return Ok(());
        }

        let backup = self.backups.backup(&doc.component_id, &doc.path)?;
        if let Err(e) = registry_fs::write_text(&doc.path, &rendered) {
            self.backups.restore(&backup, &doc.path)?;
            return Err(e.into());
        }
        Ok(())
    }

    /// Exclusive lock scoped to a whole sync pass.
    ///
    /// A second concurrent pass blocks here until the first releases.
    fn acquire_pass_lock(&self) -> Result<File> {
        let path = self.service.store().sync_lock_path();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| registry_fs::Error::io(&path, e))?;
        file.lock_exclusive()
            .map_err(|_| Error::LockFailed { path })?;
        Ok(file)
    }
}
