//! Event handlers: keyed by `(service, event)`, framed by a directive header
//!
//! Every local event handler file starts with a directive line naming the
//! service and event it handles:
//!
//! ```text
//! --#EVENT timer tick
//! print("tick")
//! ```
//!
//! The server may store the script with or without that line. Fetching
//! guarantees it is present; uploading reads the key back from it.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use solsync_fs::io;

use super::{ResourceAdapter, SCRIPT_EXTENSION};
use crate::Result;
use crate::item::{ItemKey, RemoteItem};

/// Leading token of the directive header line
pub const DIRECTIVE_PREFIX: &str = "--#EVENT";

static DIRECTIVE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"--#EVENT (\S+) (\S+)").expect("Invalid directive regex")
});

/// The exact directive line for `(service, event)`, without a terminator.
pub fn directive_for(service: &str, event: &str) -> String {
    format!("{} {} {}", DIRECTIVE_PREFIX, service, event)
}

/// Services and `service.event` pairs excluded from listing
///
/// Parsed from whitespace-separated text, e.g. `"timer device.datapoint"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipList {
    entries: Vec<String>,
}

impl SkipList {
    pub fn parse(text: &str) -> Self {
        Self {
            entries: text.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True if the whole service, or this exact event of it, is listed.
    pub fn excludes(&self, service: &str, event: &str) -> bool {
        let pair = format!("{}.{}", service, event);
        self.entries.iter().any(|e| e == service || *e == pair)
    }
}

/// Adapter for `eventhandler` resources
#[derive(Debug, Clone, Default)]
pub struct EventHandler {
    skiplist: SkipList,
}

impl EventHandler {
    pub fn new(skiplist: SkipList) -> Self {
        Self { skiplist }
    }
}

fn text_field<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    fields.get(name).and_then(Value::as_str)
}

impl ResourceAdapter for EventHandler {
    fn type_name(&self) -> &'static str {
        "EventHandler"
    }

    fn collection(&self) -> &'static str {
        "eventhandler"
    }

    fn location_key(&self) -> &'static str {
        "location.eventhandlers"
    }

    fn remote_key(&self, fields: &Map<String, Value>) -> Option<ItemKey> {
        let service = text_field(fields, "service")?;
        let event = text_field(fields, "event")?;
        Some(ItemKey::event(service, event))
    }

    fn to_remote_key(&self, path: &Path) -> Result<Option<ItemKey>> {
        let first_line = io::read_first_line(path)?;
        match DIRECTIVE_REGEX.captures(&first_line) {
            Some(caps) => Ok(Some(ItemKey::event(&caps[1], &caps[2]))),
            None => {
                tracing::warn!(path = %path.display(), "Not an event handler");
                Ok(None)
            }
        }
    }

    fn local_name(&self, key: &ItemKey) -> String {
        format!("{}.{}", self.synckey(key), SCRIPT_EXTENSION)
    }

    fn synckey(&self, key: &ItemKey) -> String {
        match key {
            ItemKey::Event { service, event } => format!("{}_{}", service, event),
            ItemKey::Name { name } => name.clone(),
        }
    }

    /// Prepend the directive unless the first line already is exactly it.
    fn frame_fetched(&self, fields: &Map<String, Value>, script: String) -> String {
        let expected = directive_for(
            text_field(fields, "service").unwrap_or_default(),
            text_field(fields, "event").unwrap_or_default(),
        );
        let first = script.lines().next().unwrap_or_default();
        if first == expected {
            script
        } else {
            format!("{}\n{}", expected, script)
        }
    }

    fn keep(&self, item: &RemoteItem) -> bool {
        let (Some(service), Some(event)) = (
            text_field(&item.fields, "service"),
            text_field(&item.fields, "event"),
        ) else {
            return true;
        };
        !self.skiplist.excludes(service, event)
    }
}
