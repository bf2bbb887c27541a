//! Resolve command implementation

use std::path::Path;

use registry_core::ConfigResolver;

use super::open_service;
use crate::error::Result;

/// Run the resolve command: print the authoritative config document
pub fn run_resolve(root: &Path, component_id: &str, version: Option<u32>) -> Result<()> {
    let resolver = ConfigResolver::new(open_service(root)?);
    let config = resolver.resolve(component_id, version)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
