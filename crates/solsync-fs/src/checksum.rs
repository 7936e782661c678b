//! SHA-256 content checksums
//!
//! Every checksum is rendered in the canonical `sha256:<hex>` form, which is
//! also how it is persisted in the change caches.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{Error, Result};

const PREFIX: &str = "sha256:";

/// A content checksum in canonical `sha256:<hex>` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checksum(String);

impl Checksum {
    /// Checksum of an in-memory buffer.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(format!("{}{:x}", PREFIX, hasher.finalize()))
    }

    /// Checksum of a file's raw bytes, read in chunks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be opened or read.
    pub fn of_file(path: &Path) -> Result<Self> {
        let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
        let mut hasher = Sha256::new();
        let mut buf = [0u8; 8192];
        loop {
            let n = file.read(&mut buf).map_err(|e| Error::io(path, e))?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(Self(format!("{}{:x}", PREFIX, hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_value() {
        assert_eq!(
            Checksum::of_bytes(b"hello world").as_str(),
            "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn file_checksum_matches_buffer_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mod.lua");
        std::fs::write(&path, "hello world").unwrap();

        assert_eq!(Checksum::of_file(&path).unwrap(), Checksum::of_bytes(b"hello world"));
    }

    #[test]
    fn file_checksum_spans_multiple_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.lua");
        let content = "x".repeat(20_000);
        std::fs::write(&path, &content).unwrap();

        assert_eq!(
            Checksum::of_file(&path).unwrap(),
            Checksum::of_bytes(content.as_bytes())
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Checksum::of_file(Path::new("/nonexistent/file.lua")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn serializes_as_plain_string() {
        let cs = Checksum::of_bytes(b"a");
        let yaml = serde_yaml::to_string(&cs).unwrap();
        assert!(yaml.trim().starts_with("sha256:"));
    }
}
