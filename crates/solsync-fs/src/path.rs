//! Normalized absolute paths used as stable cache keys

use std::path::Path;

use serde::{Deserialize, Serialize};

/// An absolute path normalized to forward slashes.
///
/// Cache stores are keyed by local file path as text; normalizing once here
/// keeps the same file from appearing under two spellings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Normalize a path without touching the filesystem.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: path_str.replace('\\', "/"),
        }
    }

    /// Resolve `path` to an absolute, canonical form, then normalize it.
    ///
    /// Falls back to joining with the working directory when the path cannot
    /// be canonicalized (for example when it does not exist yet).
    pub fn absolute(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let resolved = dunce::canonicalize(path)
            .or_else(|_| std::path::absolute(path))
            .unwrap_or_else(|_| path.to_path_buf());
        Self::new(resolved)
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    pub fn file_name(&self) -> Option<&str> {
        self.inner
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backslashes_become_forward_slashes() {
        let p = NormalizedPath::new("C:\\work\\modules\\util.lua");
        assert_eq!(p.as_str(), "C:/work/modules/util.lua");
        assert_eq!(p.file_name(), Some("util.lua"));
    }

    #[test]
    fn absolute_resolves_relative_segments() {
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("modules");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("a.lua"), "").unwrap();

        let via_dots = NormalizedPath::absolute(dir.join("..").join("modules").join("a.lua"));
        let direct = NormalizedPath::absolute(dir.join("a.lua"));
        assert_eq!(via_dots, direct);
        assert!(direct.as_ref().is_absolute());
    }

    #[test]
    fn absolute_handles_missing_files() {
        let p = NormalizedPath::absolute("does-not-exist.lua");
        assert!(p.as_ref().is_absolute());
        assert_eq!(p.file_name(), Some("does-not-exist.lua"));
    }
}
