//! Core orchestration layer for Component Registry
//!
//! This crate implements the component version store and the bilateral
//! synchronization engine that governs agent, team, and workflow
//! configuration documents:
//!
//! - **Version store**: durable table of configuration versions with
//!   lifecycle flags and an append-only audit trail
//! - **Version service**: create, activate, deprecate, clone, and update
//!   operations enforcing the single-active-version invariant
//! - **Sync engine**: reconciles declarative files on disk against the
//!   store with a deterministic conflict policy
//! - **Resolution API**: the read path handed to component factories
//!
//! # Architecture
//!
//! `registry-core` sits above the layer 0 crates and below the CLI:
//!
//! ```text
//!        CLI / embedding application
//!                   |
//!             registry-core
//!                   |
//!          +--------+--------+
//!          |                 |
//!    registry-meta     registry-fs
//! ```

pub mod backup;
pub mod error;
pub mod resolve;
pub mod service;
pub mod store;
pub mod sync;

pub use backup::{BackupEntry, BackupMetadata, FileBackup};
pub use error::{Error, Result};
pub use resolve::ConfigResolver;
pub use service::{NewVersion, VersionService};
pub use store::{
    ComponentVersion, HistoryAction, HistoryRecord, RegistryState, SyncSource, VersionStore,
};
pub use sync::{ComponentSyncResult, SkippedFileReport, SyncEngine, SyncOptions, SyncReport, SyncStatus};
