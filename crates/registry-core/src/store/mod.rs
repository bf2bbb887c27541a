//! Durable version store
//!
//! The store is a single JSON state document holding both tables (row
//! types in `model`, document shape in `state`), persisted with atomic
//! temp-file-then-rename writes. `mutate` is the transactional primitive:
//! an exclusive advisory lock on a dedicated lock file spans the load,
//! the caller's mutation, and the save, so read-modify-write sequences
//! are atomic across threads and processes.

mod model;
mod state;

pub use model::{ComponentVersion, HistoryAction, HistoryRecord, SyncSource};
pub use state::RegistryState;

use std::fs::{File, OpenOptions};
use std::io::Read;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::debug;

use crate::{Error, Result};

const STATE_FILE: &str = "registry.json";
const LOCK_FILE: &str = "registry.lock";
const SYNC_LOCK_FILE: &str = "sync.lock";

/// Handle to the on-disk version store
///
/// Cheap to clone; every handle coordinates through the same lock file.
#[derive(Debug, Clone)]
pub struct VersionStore {
    state_dir: PathBuf,
    state_path: PathBuf,
    lock_path: PathBuf,
}

impl VersionStore {
    /// Open (creating if needed) the store under `state_dir`.
    pub fn open(state_dir: impl Into<PathBuf>) -> Result<Self> {
        let state_dir = state_dir.into();
        std::fs::create_dir_all(&state_dir)
            .map_err(|e| registry_fs::Error::io(&state_dir, e))?;

        Ok(Self {
            state_path: state_dir.join(STATE_FILE),
            lock_path: state_dir.join(LOCK_FILE),
            state_dir,
        })
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    /// Lock file serializing whole sync passes (held by the sync engine)
    pub fn sync_lock_path(&self) -> PathBuf {
        self.state_dir.join(SYNC_LOCK_FILE)
    }

    /// Load the current state under a shared lock.
    ///
    /// A store that has never been written reads as empty.
    pub fn load(&self) -> Result<RegistryState> {
        if !self.state_path.exists() {
            return Ok(RegistryState::new());
        }

        let file = File::open(&self.state_path)
            .map_err(|e| registry_fs::Error::io(&self.state_path, e))?;
        file.lock_shared().map_err(|_| Error::LockFailed {
            path: self.state_path.clone(),
        })?;

        // Read through the locked handle to avoid a TOCTOU window
        let mut content = String::new();
        (&file)
            .read_to_string(&mut content)
            .map_err(|e| registry_fs::Error::io(&self.state_path, e))?;

        serde_json::from_str(&content).map_err(|e| Error::StateCorrupt {
            path: self.state_path.clone(),
            message: e.to_string(),
        })
    }

    /// Run `f` as one transaction: exclusive lock, load, mutate, save.
    ///
    /// If `f` fails nothing is written and the state on disk is unchanged.
    pub fn mutate<T>(&self, f: impl FnOnce(&mut RegistryState) -> Result<T>) -> Result<T> {
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|e| registry_fs::Error::io(&self.lock_path, e))?;

        // Blocks until any concurrent transaction finishes
        lock_file.lock_exclusive().map_err(|_| Error::LockFailed {
            path: self.lock_path.clone(),
        })?;

        let mut state = self.load()?;
        let outcome = f(&mut state)?;

        let content = serde_json::to_string_pretty(&state)?;
        registry_fs::write_atomic(&self.state_path, content.as_bytes())?;
        debug!(path = %self.state_path.display(), "registry state persisted");

        // Lock released when lock_file is dropped
        Ok(outcome)
    }
}
