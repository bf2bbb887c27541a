//! Declarative file backup and restore
//!
//! Before the sync engine rewrites a declarative file it copies the file
//! aside. Backups live at `<state dir>/backups/{component_id}/` with:
//! - metadata.toml: entry list with timestamps and content checksums
//! - timestamped copies of the original file
//!
//! Only the newest N backups per component are retained.

mod file_backup;

pub use file_backup::{BackupEntry, BackupMetadata, FileBackup};
