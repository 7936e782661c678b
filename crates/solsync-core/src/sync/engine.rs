//! SyncEngine implementation
//!
//! The SyncEngine performs list/fetch/upload/remove for one resource type
//! and decides whether a local file and a remote item are out of sync.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use solsync_fs::io;

use crate::cache::ChangeCache;
use crate::config::SyncContext;
use crate::item::{ItemKey, RemoteItem, Timestamped, UpdatedAt, parse_timestamp};
use crate::remote::{RemoteClient, RemoteError};
use crate::resource::ResourceAdapter;
use crate::{Error, Result};

/// How a successful upload landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The item existed and was updated in place
    Updated,
    /// The update reported "not found" and the item was created
    Created,
}

/// Engine for synchronizing one resource type
///
/// Holds the resource adapter, the remote client, the explicit context and
/// the adapter's change cache.
pub struct SyncEngine<A> {
    adapter: A,
    remote: Arc<dyn RemoteClient>,
    context: SyncContext,
    cache: ChangeCache,
}

impl<A: ResourceAdapter> SyncEngine<A> {
    /// Create a new SyncEngine
    ///
    /// The change cache is the adapter's store inside the context's state
    /// directory.
    pub fn new(adapter: A, remote: Arc<dyn RemoteClient>, context: SyncContext) -> Self {
        let cache = ChangeCache::for_adapter(&context, adapter.type_name());
        Self {
            adapter,
            remote,
            context,
            cache,
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn context(&self) -> &SyncContext {
        &self.context
    }

    pub fn cache(&self) -> &ChangeCache {
        &self.cache
    }

    fn collection_path(&self) -> String {
        format!("{}/", self.adapter.collection())
    }

    fn item_path(&self, alias: &str) -> String {
        format!("{}/{}", self.adapter.collection(), alias)
    }

    /// Alias an item with this key is addressed by
    pub fn alias_for(&self, key: &ItemKey) -> String {
        key.alias(self.context.solution_id())
    }

    /// Fetch the remote collection and apply the adapter's filter.
    ///
    /// Server order is preserved. Objects without the fields this resource
    /// type is keyed by are dropped with a warning.
    pub fn list(&self) -> Result<Vec<RemoteItem>> {
        let path = self.collection_path();
        let response = self.remote.get(&path)?;

        let raw_items = match response {
            Value::Object(mut obj) => match obj.remove("items") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(Error::InvalidResponse {
                        path,
                        message: "missing 'items' array".into(),
                    });
                }
            },
            Value::Array(items) => items,
            other => {
                return Err(Error::InvalidResponse {
                    path,
                    message: format!("expected an object, got {}", other),
                });
            }
        };

        let mut items = Vec::with_capacity(raw_items.len());
        for raw in raw_items {
            let Value::Object(fields) = raw else {
                tracing::warn!(collection = self.adapter.collection(), "Ignoring non-object item");
                continue;
            };
            let Some(key) = self.adapter.remote_key(&fields) else {
                tracing::warn!(
                    collection = self.adapter.collection(),
                    alias = ?fields.get("alias"),
                    "Ignoring item without identity fields"
                );
                continue;
            };
            let item = RemoteItem::from_fields(key, fields);
            if self.adapter.keep(&item) {
                items.push(item);
            } else {
                tracing::debug!(key = %item.key, "Skipped by filter");
            }
        }
        Ok(items)
    }

    /// Fetch one item's script, framed by the adapter.
    pub fn fetch(&self, alias: &str) -> Result<String> {
        let path = self.item_path(alias);
        let fields = match self.remote.get(&path)? {
            Value::Object(fields) => fields,
            other => {
                return Err(Error::InvalidResponse {
                    path,
                    message: format!("expected an object, got {}", other),
                });
            }
        };
        let script = fields
            .get("script")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Ok(self.adapter.frame_fetched(&fields, script))
    }

    /// Delete one remote item. Not retried.
    pub fn remove(&self, alias: &str) -> Result<()> {
        self.remote.delete(&self.item_path(alias))?;
        tracing::info!(alias, "Removed remote item");
        Ok(())
    }

    /// Push a local file to the remote item identified by `key`.
    ///
    /// Attempts an update in place first and falls back to creating the item
    /// only when the update reports "not found". On success the file is
    /// recorded in the change cache; on failure the cache is left untouched.
    ///
    /// # Errors
    ///
    /// - local I/O failure reading the file
    /// - [`Error::Upload`] when the server rejects the update or create
    /// - [`Error::Remote`] when the server cannot be reached
    pub fn upload(&self, local: &Path, key: &ItemKey) -> Result<UploadOutcome> {
        let script = io::read_text(local)?;
        let alias = self.alias_for(key);

        let mut payload = Map::new();
        key.write_fields(&mut payload);
        payload.insert(
            "solution_id".into(),
            Value::String(self.context.solution_id().to_string()),
        );
        payload.insert("script".into(), Value::String(script));
        let payload = Value::Object(payload);

        let outcome = match self.remote.put(&self.item_path(&alias), &payload) {
            Ok(_) => UploadOutcome::Updated,
            Err(RemoteError::NotFound { .. }) => {
                tracing::info!(%alias, "Doesn't exist, creating");
                self.remote
                    .post(&self.collection_path(), &payload)
                    .map_err(|e| upload_error(&alias, e))?;
                UploadOutcome::Created
            }
            Err(e) => return Err(upload_error(&alias, e)),
        };

        self.cache.record_sync(local, None)?;
        tracing::debug!(%alias, ?outcome, path = %local.display(), "Uploaded");
        Ok(outcome)
    }

    /// Decide whether two representations are out of sync.
    ///
    /// Each side's effective timestamp is resolved (and memoized on it):
    ///
    /// 1. an already-resolved instant is used as-is;
    /// 2. a local file with no timestamp uses its change-cache entry, or its
    ///    modification time when the cache has no valid entry;
    /// 3. a textual timestamp is parsed as UTC.
    ///
    /// The two are equal when they match at whole-second resolution.
    pub fn compare_timestamps<L, R>(&self, a: &mut L, b: &mut R) -> Result<bool>
    where
        L: Timestamped,
        R: Timestamped,
    {
        let at_a = self.effective_timestamp(a)?;
        let at_b = self.effective_timestamp(b)?;
        Ok(at_a.timestamp() != at_b.timestamp())
    }

    fn effective_timestamp<T: Timestamped>(&self, side: &mut T) -> Result<DateTime<Utc>> {
        let resolved = match side.updated_at() {
            Some(UpdatedAt::Instant(at)) => return Ok(*at),
            Some(UpdatedAt::Text(text)) => parse_timestamp(text)?,
            None => {
                let Some(path) = side.local_path().map(Path::to_path_buf) else {
                    return Err(Error::MissingTimestamp {
                        what: side.describe(),
                    });
                };
                match self.cache.lookup_sync(&path)? {
                    Some(at) => at,
                    None => {
                        tracing::debug!(path = %path.display(), "Falling back to mtime");
                        DateTime::<Utc>::from(io::modified(&path)?)
                    }
                }
            }
        };
        side.set_updated_at(resolved);
        Ok(resolved)
    }
}

fn upload_error(alias: &str, error: RemoteError) -> Error {
    match error {
        RemoteError::Status { status, body, .. } => Error::Upload {
            alias: alias.to_string(),
            status,
            body,
        },
        RemoteError::NotFound { .. } => Error::Upload {
            alias: alias.to_string(),
            status: 404,
            body: String::new(),
        },
        other => Error::Remote(other),
    }
}
