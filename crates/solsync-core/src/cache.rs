//! Content-addressed change cache
//!
//! Remembers, per local file, the checksum the file had when it was last
//! synchronized and when that happened. An entry only counts as evidence of
//! a sync while the file still has that checksum; after any edit the entry
//! is stale and comparisons fall back to the file's modification time.
//!
//! One YAML store per resource adapter type, `cache.<Type>.yaml`, in the
//! project state directory:
//!
//! ```yaml
//! /work/project/modules/util.lua:
//!   checksum: sha256:9f86d0...
//!   synced_at: 2016-07-01T10:00:00.123Z
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use solsync_fs::io::{self, LockGuard};
use solsync_fs::{Checksum, NormalizedPath, StructuredFile};

use crate::Result;
use crate::config::SyncContext;

type RawEntries = BTreeMap<String, serde_yaml::Value>;

/// What the cache knows about one local file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub checksum: Checksum,
    #[serde(with = "millis")]
    pub synced_at: DateTime<Utc>,
}

mod millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(d)?;
        crate::item::parse_timestamp(&text).map_err(D::Error::custom)
    }
}

/// Persistent path -> [`CacheEntry`] mapping for one adapter type
#[derive(Debug, Clone)]
pub struct ChangeCache {
    store: PathBuf,
}

impl ChangeCache {
    pub fn new(store: impl Into<PathBuf>) -> Self {
        Self {
            store: store.into(),
        }
    }

    /// The cache for adapter type `type_name` within a project.
    pub fn for_adapter(ctx: &SyncContext, type_name: &str) -> Self {
        Self::new(ctx.file_at(&format!("cache.{}.yaml", type_name)))
    }

    pub fn store_path(&self) -> &Path {
        &self.store
    }

    /// Record that `path` was synchronized at `at` (now, if `None`).
    ///
    /// Checksums the file, then rewrites the store under an exclusive lock,
    /// preserving every other entry. Returns the timestamp recorded.
    ///
    /// # Errors
    ///
    /// Fails if `path` cannot be read or the store cannot be written.
    pub fn record_sync(&self, path: &Path, at: Option<DateTime<Utc>>) -> Result<DateTime<Utc>> {
        let at = at.unwrap_or_else(Utc::now);
        let checksum = Checksum::of_file(path)?;
        let key = NormalizedPath::absolute(path);

        let _lock = LockGuard::acquire(&self.store)?;
        let file = StructuredFile::new(&self.store)?;
        let mut entries = self.read_for_update(&file)?;
        let entry = CacheEntry {
            checksum,
            synced_at: at,
        };
        entries.insert(key.to_string(), serde_yaml::to_value(&entry)?);
        file.save(&entries)?;

        tracing::debug!(path = %key, checksum = %entry.checksum, "Recorded sync");
        Ok(at)
    }

    /// The recorded sync time of `path`, if the file is unchanged since.
    ///
    /// # Errors
    ///
    /// Fails if `path` cannot be read. An unparseable store is treated as
    /// empty.
    pub fn lookup_sync(&self, path: &Path) -> Result<Option<DateTime<Utc>>> {
        let checksum = Checksum::of_file(path)?;
        let key = NormalizedPath::absolute(path);

        let entries = self.read_entries()?;
        let Some(raw) = entries.get(key.as_str()) else {
            tracing::debug!(path = %key, "No cache entry");
            return Ok(None);
        };
        let entry: CacheEntry = match serde_yaml::from_value(raw.clone()) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(path = %key, error = %e, "Ignoring unreadable cache entry");
                return Ok(None);
            }
        };

        tracing::debug!(
            path = %key,
            cached = %entry.checksum,
            current = %checksum,
            "Cache lookup"
        );
        if entry.checksum == checksum {
            Ok(Some(entry.synced_at))
        } else {
            Ok(None)
        }
    }

    /// All readable entries, keyed by normalized absolute path.
    pub fn entries(&self) -> Result<BTreeMap<String, CacheEntry>> {
        Ok(self
            .read_entries()?
            .into_iter()
            .filter_map(|(k, v)| serde_yaml::from_value(v).ok().map(|e| (k, e)))
            .collect())
    }

    fn read_entries(&self) -> Result<RawEntries> {
        let content = match io::read_text(&self.store) {
            Ok(content) => content,
            Err(e) if e.is_not_found() => return Ok(RawEntries::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(RawEntries::new());
        }
        let file = StructuredFile::new(&self.store)?;
        match file.parse(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(store = %self.store.display(), error = %e, "Cache store is corrupt, ignoring it");
                Ok(RawEntries::new())
            }
        }
    }

    /// Read the store for a rewrite. A corrupt store is moved aside to
    /// `<store>.corrupt` so the rewrite never silently destroys it.
    fn read_for_update(&self, file: &StructuredFile) -> Result<RawEntries> {
        let content = match io::read_text(file.path()) {
            Ok(content) => content,
            Err(e) if e.is_not_found() => return Ok(RawEntries::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(RawEntries::new());
        }
        match file.parse(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                let mut aside = self.store.clone().into_os_string();
                aside.push(".corrupt");
                let aside = PathBuf::from(aside);
                tracing::warn!(
                    store = %self.store.display(),
                    moved_to = %aside.display(),
                    error = %e,
                    "Cache store is corrupt, starting a new one"
                );
                fs::rename(&self.store, &aside)?;
                Ok(RawEntries::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn at(secs: u32, millis: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 7, 1, 10, 0, secs).unwrap()
            + chrono::Duration::milliseconds(millis as i64)
    }

    #[test]
    fn entry_serializes_with_millisecond_precision() {
        let entry = CacheEntry {
            checksum: Checksum::of_bytes(b"x"),
            synced_at: at(5, 123),
        };
        let yaml = serde_yaml::to_string(&entry).unwrap();
        assert!(yaml.contains("2016-07-01T10:00:05.123Z"), "{yaml}");
    }

    #[test]
    fn empty_store_file_reads_as_empty() {
        let temp = TempDir::new().unwrap();
        let store = temp.path().join("cache.Library.yaml");
        fs::write(&store, "").unwrap();
        let src = temp.path().join("a.lua");
        fs::write(&src, "x").unwrap();

        let cache = ChangeCache::new(&store);
        assert_eq!(cache.lookup_sync(&src).unwrap(), None);
        cache.record_sync(&src, Some(at(0, 0))).unwrap();
        assert_eq!(cache.lookup_sync(&src).unwrap(), Some(at(0, 0)));
    }

    #[test]
    fn malformed_entry_is_ignored_but_preserved() {
        let temp = TempDir::new().unwrap();
        let store = temp.path().join("cache.Library.yaml");
        let a = temp.path().join("a.lua");
        let b = temp.path().join("b.lua");
        fs::write(&a, "a").unwrap();
        fs::write(&b, "b").unwrap();
        let a_key = NormalizedPath::absolute(&a);
        fs::write(&store, format!("{}: just a string\n", a_key)).unwrap();

        let cache = ChangeCache::new(&store);
        assert_eq!(cache.lookup_sync(&a).unwrap(), None);

        cache.record_sync(&b, Some(at(1, 0))).unwrap();
        let raw = fs::read_to_string(&store).unwrap();
        assert!(raw.contains("just a string"));
        assert_eq!(cache.entries().unwrap().len(), 1);
    }
}
