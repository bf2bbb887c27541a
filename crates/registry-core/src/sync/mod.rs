//! Sync engine for converging the version store and declarative files
//!
//! This module provides:
//! - **sync_all**: one reconciliation pass over every discovered component
//! - **sync_component**: force-sync of a single component
//! - **report**: per-component outcomes aggregated for observability
//!
//! The store is authoritative on conflicts; neither side's data is ever
//! silently lost.

mod engine;
mod report;

pub use engine::{SyncEngine, SyncOptions};
pub use report::{ComponentSyncResult, SkippedFileReport, SyncReport, SyncStatus};
