//! Declarative component document model for Component Registry
//!
//! This crate defines the on-disk representation of governed components:
//! the three component types (agent, team, workflow), their directory and
//! identity-field conventions, YAML parsing into an opaque payload, and
//! discovery of declarative files under a content root.

pub mod component;
pub mod document;
pub mod error;
pub mod scanner;

pub use component::ComponentType;
pub use document::{ComponentDocument, render_config};
pub use error::{Error, Result};
pub use scanner::{Discovery, DocumentScanner, SkippedFile};
