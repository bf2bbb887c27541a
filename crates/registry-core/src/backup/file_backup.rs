//! File backup implementation

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::Result;

/// One retained backup copy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupEntry {
    /// File name of the copy inside the component's backup directory
    pub file_name: String,
    /// Path the file was copied from
    pub original_path: String,
    pub created: DateTime<Utc>,
    /// Checksum of the copied content, for restore verification
    pub checksum: String,
}

/// Metadata sidecar for one component's backups
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupMetadata {
    #[serde(default)]
    pub entries: Vec<BackupEntry>,
}

/// Manages timestamped backups of declarative files
#[derive(Debug, Clone)]
pub struct FileBackup {
    backups_dir: PathBuf,
    retain: usize,
}

impl FileBackup {
    /// Backups kept per component unless overridden
    pub const DEFAULT_RETAIN: usize = 5;

    pub fn new(backups_dir: impl Into<PathBuf>) -> Self {
        Self {
            backups_dir: backups_dir.into(),
            retain: Self::DEFAULT_RETAIN,
        }
    }

    pub fn with_retention(mut self, retain: usize) -> Self {
        self.retain = retain.max(1);
        self
    }

    fn component_dir(&self, component_id: &str) -> PathBuf {
        self.backups_dir.join(component_id)
    }

    fn metadata_path(&self, component_id: &str) -> PathBuf {
        self.component_dir(component_id).join("metadata.toml")
    }

    /// Copy `file` aside before a rewrite. Returns the backup copy's path.
    pub fn backup(&self, component_id: &str, file: &Path) -> Result<PathBuf> {
        let dir = self.component_dir(component_id);
        fs::create_dir_all(&dir).map_err(|e| registry_fs::Error::io(&dir, e))?;

        let stem = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document");
        let timestamp = Utc::now();
        let mut file_name = format!("{}-{}", timestamp.format("%Y%m%dT%H%M%S%3f"), stem);
        // Same-millisecond collisions get a numeric disambiguator
        let mut attempt = 0;
        while dir.join(&file_name).exists() {
            attempt += 1;
            file_name = format!(
                "{}-{}-{}",
                timestamp.format("%Y%m%dT%H%M%S%3f"),
                attempt,
                stem
            );
        }
        let dest = dir.join(&file_name);

        fs::copy(file, &dest).map_err(|e| registry_fs::Error::io(file, e))?;
        let checksum = registry_fs::compute_file_checksum(&dest)?;

        let mut metadata = self.load_metadata(component_id)?;
        metadata.entries.push(BackupEntry {
            file_name,
            original_path: file.display().to_string(),
            created: timestamp,
            checksum,
        });
        self.prune(component_id, &mut metadata)?;
        self.save_metadata(component_id, &metadata)?;

        debug!(component_id = %component_id, backup = %dest.display(), "file backed up");
        Ok(dest)
    }

    /// Copy a backup back over `dest`. Used when a rewrite fails midway.
    pub fn restore(&self, backup: &Path, dest: &Path) -> Result<()> {
        fs::copy(backup, dest).map_err(|e| registry_fs::Error::io(backup, e))?;
        debug!(backup = %backup.display(), dest = %dest.display(), "file restored from backup");
        Ok(())
    }

    /// Retained backups for a component, oldest first.
    pub fn list(&self, component_id: &str) -> Result<Vec<BackupEntry>> {
        Ok(self.load_metadata(component_id)?.entries)
    }

    fn prune(&self, component_id: &str, metadata: &mut BackupMetadata) -> Result<()> {
        while metadata.entries.len() > self.retain {
            let stale = metadata.entries.remove(0);
            let path = self.component_dir(component_id).join(&stale.file_name);
            if path.exists() {
                fs::remove_file(&path).map_err(|e| registry_fs::Error::io(&path, e))?;
            }
        }
        Ok(())
    }

    fn load_metadata(&self, component_id: &str) -> Result<BackupMetadata> {
        let path = self.metadata_path(component_id);
        if !path.exists() {
            return Ok(BackupMetadata::default());
        }
        let content = registry_fs::read_text(&path)?;
        Ok(toml::from_str(&content)?)
    }

    fn save_metadata(&self, component_id: &str, metadata: &BackupMetadata) -> Result<()> {
        let content = toml::to_string_pretty(metadata)?;
        registry_fs::write_text(&self.metadata_path(component_id), &content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn backup_copies_file_and_records_metadata() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.yaml");
        fs::write(&file, "agent:\n  agent_id: demo\n").unwrap();

        let backups = FileBackup::new(dir.path().join("backups"));
        let copy = backups.backup("demo", &file).unwrap();

        assert!(copy.exists());
        assert_eq!(
            fs::read_to_string(&copy).unwrap(),
            "agent:\n  agent_id: demo\n"
        );

        let entries = backups.list("demo").unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].checksum.starts_with("sha256:"));
    }

    #[test]
    fn restore_brings_back_original_content() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.yaml");
        fs::write(&file, "original").unwrap();

        let backups = FileBackup::new(dir.path().join("backups"));
        let copy = backups.backup("demo", &file).unwrap();

        fs::write(&file, "clobbered").unwrap();
        backups.restore(&copy, &file).unwrap();

        assert_eq!(fs::read_to_string(&file).unwrap(), "original");
    }

    #[test]
    fn prune_keeps_only_newest_backups() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.yaml");

        let backups = FileBackup::new(dir.path().join("backups")).with_retention(2);
        for round in 0..4 {
            fs::write(&file, format!("content {}", round)).unwrap();
            backups.backup("demo", &file).unwrap();
        }

        let entries = backups.list("demo").unwrap();
        assert_eq!(entries.len(), 2);

        // Copies on disk match the metadata exactly (plus the sidecar)
        let on_disk = fs::read_dir(dir.path().join("backups/demo"))
            .unwrap()
            .count();
        assert_eq!(on_disk, 3);

        // The survivors are the newest two
        let newest = backups.list("demo").unwrap();
        let last = dir.path().join("backups/demo").join(&newest[1].file_name);
        assert_eq!(fs::read_to_string(last).unwrap(), "content 3");
    }

    #[test]
    fn components_do_not_share_backup_dirs() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("config.yaml");
        fs::write(&file, "x").unwrap();

        let backups = FileBackup::new(dir.path().join("backups"));
        backups.backup("one", &file).unwrap();
        backups.backup("two", &file).unwrap();

        assert_eq!(backups.list("one").unwrap().len(), 1);
        assert_eq!(backups.list("two").unwrap().len(), 1);
    }
}
