//! Resource adapters
//!
//! Each remote resource type differs in how items are named, how their
//! content is framed in local files, and which items are listed. A
//! [`ResourceAdapter`] captures those rules; the sync engine is generic over
//! it.

mod event_handler;
mod library;

pub use event_handler::{DIRECTIVE_PREFIX, EventHandler, SkipList, directive_for};
pub use library::Library;

use std::path::Path;

use serde_json::{Map, Value};

use crate::Result;
use crate::item::{ItemKey, RemoteItem};

/// Extension of every local script file
pub const SCRIPT_EXTENSION: &str = "lua";

/// Per-resource-type naming, framing and filtering rules
pub trait ResourceAdapter: Send + Sync {
    /// Type name; keys the change cache store (`cache.<type_name>.yaml`)
    fn type_name(&self) -> &'static str;

    /// Collection path under the solution endpoint (e.g. `library`)
    fn collection(&self) -> &'static str;

    /// Settings key naming the local directory for this type
    fn location_key(&self) -> &'static str;

    /// Resolve the key of a remote object, or `None` if it lacks the fields
    /// this type is keyed by.
    fn remote_key(&self, fields: &Map<String, Value>) -> Option<ItemKey>;

    /// Remote key for a local file.
    ///
    /// `Ok(None)` means the file is not a valid artifact of this type; the
    /// adapter has already warned and the caller should skip it.
    fn to_remote_key(&self, path: &Path) -> Result<Option<ItemKey>>;

    /// File name a remote item is stored under locally
    fn local_name(&self, key: &ItemKey) -> String;

    /// Stable string pairing local files with remote items
    fn synckey(&self, key: &ItemKey) -> String;

    /// Frame fetched content before it is handed to the caller.
    fn frame_fetched(&self, _fields: &Map<String, Value>, script: String) -> String {
        script
    }

    /// Listing filter; items returning `false` are dropped from `list`.
    fn keep(&self, _item: &RemoteItem) -> bool {
        true
    }
}

/// Which resource type a command addresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Library,
    EventHandler,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Library, ResourceKind::EventHandler];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Library => "library",
            Self::EventHandler => "eventhandler",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "library" | "modules" | "module" => Ok(Self::Library),
            "eventhandler" | "eventhandlers" | "event" => Ok(Self::EventHandler),
            _ => Err(crate::Error::InvalidSetting {
                key: "resource".into(),
                message: format!("unknown resource type '{}'", s),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_kind_parses_aliases() {
        assert_eq!("modules".parse::<ResourceKind>().unwrap(), ResourceKind::Library);
        assert_eq!(
            "EventHandler".parse::<ResourceKind>().unwrap(),
            ResourceKind::EventHandler
        );
        assert!("files".parse::<ResourceKind>().is_err());
    }
}
