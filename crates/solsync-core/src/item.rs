//! Remote and local representations of a resource instance

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Identity of a resource instance.
///
/// Resolved once, when an item is constructed, by the resource adapter that
/// owns it. Call sites never re-inspect raw JSON to work out the key shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemKey {
    /// Library modules are addressed by name
    Name { name: String },
    /// Event handlers are addressed by their `(service, event)` pair
    Event { service: String, event: String },
}

impl ItemKey {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name { name: name.into() }
    }

    pub fn event(service: impl Into<String>, event: impl Into<String>) -> Self {
        Self::Event {
            service: service.into(),
            event: event.into(),
        }
    }

    /// URL-safe alias of this item within `solution_id`.
    pub fn alias(&self, solution_id: &str) -> String {
        match self {
            Self::Name { name } => format!("{}_{}", solution_id, name),
            Self::Event { service, event } => format!("{}_{}_{}", solution_id, service, event),
        }
    }

    /// Insert the identity fields into a JSON object.
    pub fn write_fields(&self, object: &mut Map<String, Value>) {
        match self {
            Self::Name { name } => {
                object.insert("name".into(), Value::String(name.clone()));
            }
            Self::Event { service, event } => {
                object.insert("service".into(), Value::String(service.clone()));
                object.insert("event".into(), Value::String(event.clone()));
            }
        }
    }
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name { name } => f.write_str(name),
            Self::Event { service, event } => write!(f, "{}.{}", service, event),
        }
    }
}

/// A timestamp as carried by an item: either resolved or still text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatedAt {
    Instant(DateTime<Utc>),
    Text(String),
}

impl UpdatedAt {
    /// Resolve to a UTC instant, parsing text if needed.
    pub fn to_instant(&self) -> Result<DateTime<Utc>> {
        match self {
            Self::Instant(t) => Ok(*t),
            Self::Text(s) => parse_timestamp(s),
        }
    }
}

/// Parse a server timestamp into UTC.
///
/// Accepts RFC 3339, ISO-8601 offsets written without a colon (`+0000`) or
/// as hours only (`+00`), and offset-less date-times, which are taken to be
/// UTC.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    let trimmed = text.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(t.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(t) = DateTime::parse_from_str(trimmed, format) {
            return Ok(t.with_timezone(&Utc));
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc());
        }
    }
    Err(Error::InvalidTimestamp {
        value: text.to_string(),
    })
}

/// An item as known to the server
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteItem {
    /// Alias reported by the server, if any
    pub alias: Option<String>,
    pub key: ItemKey,
    pub script: Option<String>,
    pub updated_at: Option<UpdatedAt>,
    /// The full object as received
    pub fields: Map<String, Value>,
}

impl RemoteItem {
    /// Build from a server object with an already-resolved key.
    pub fn from_fields(key: ItemKey, fields: Map<String, Value>) -> Self {
        let text = |name: &str| fields.get(name).and_then(Value::as_str).map(str::to_string);
        Self {
            alias: text("alias"),
            script: text("script"),
            updated_at: text("updated_at").map(UpdatedAt::Text),
            key,
            fields,
        }
    }

    /// The alias to address this item by: the server's, or one derived from the key.
    pub fn alias_in(&self, solution_id: &str) -> String {
        self.alias
            .clone()
            .unwrap_or_else(|| self.key.alias(solution_id))
    }
}

/// A file on disk representing a resource instance
#[derive(Debug, Clone, PartialEq)]
pub struct LocalItem {
    pub path: PathBuf,
    pub key: ItemKey,
    /// Absent at rest; resolved lazily during comparison
    pub updated_at: Option<UpdatedAt>,
}

impl LocalItem {
    pub fn new(path: impl Into<PathBuf>, key: ItemKey) -> Self {
        Self {
            path: path.into(),
            key,
            updated_at: None,
        }
    }
}

/// Either side of a timestamp comparison.
pub trait Timestamped {
    fn updated_at(&self) -> Option<&UpdatedAt>;

    fn set_updated_at(&mut self, at: DateTime<Utc>);

    /// Local file backing this item, if any.
    fn local_path(&self) -> Option<&Path> {
        None
    }

    /// Short description for diagnostics.
    fn describe(&self) -> String;
}

impl Timestamped for RemoteItem {
    fn updated_at(&self) -> Option<&UpdatedAt> {
        self.updated_at.as_ref()
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(UpdatedAt::Instant(at));
    }

    fn describe(&self) -> String {
        format!("remote {}", self.key)
    }
}

impl Timestamped for LocalItem {
    fn updated_at(&self) -> Option<&UpdatedAt> {
        self.updated_at.as_ref()
    }

    fn set_updated_at(&mut self, at: DateTime<Utc>) {
        self.updated_at = Some(UpdatedAt::Instant(at));
    }

    fn local_path(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn describe(&self) -> String {
        format!("local {}", self.path.display())
    }
}
