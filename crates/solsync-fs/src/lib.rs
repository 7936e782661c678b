//! Filesystem primitives for solsync
//!
//! Provides content checksums, locked atomic writes, normalized paths and
//! a format-agnostic structured file store used for settings and caches.

pub mod checksum;
pub mod error;
pub mod io;
pub mod path;
pub mod store;

pub use checksum::Checksum;
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use store::{Format, StructuredFile};
