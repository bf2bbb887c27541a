//! Command implementations

mod resolve;
mod sync;
mod version;

pub use resolve::run_resolve;
pub use sync::run_sync;
pub use version::{
    run_activate, run_clone, run_create, run_deprecate, run_history, run_list, run_show,
    run_update_config,
};

use std::path::Path;

use registry_core::{VersionService, VersionStore};

use crate::error::Result;

/// Directory under the content root holding store state
const STATE_DIR: &str = ".registry";

/// Open the version service for a content root.
pub fn open_service(root: &Path) -> Result<VersionService> {
    let store = VersionStore::open(root.join(STATE_DIR))?;
    Ok(VersionService::new(store))
}
