//! Filesystem primitives for Component Registry
//!
//! Provides path-anchored errors, locked atomic writes, and content
//! checksums shared by the higher layers.

pub mod checksum;
pub mod error;
pub mod io;

pub use checksum::{compute_content_checksum, compute_file_checksum};
pub use error::{Error, Result};
pub use io::{read_text, write_atomic, write_text};
