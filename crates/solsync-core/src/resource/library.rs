//! Library modules: keyed by name, stored verbatim

use std::path::Path;

use serde_json::{Map, Value};

use super::{ResourceAdapter, SCRIPT_EXTENSION};
use crate::Result;
use crate::item::ItemKey;

/// Adapter for `library` resources
#[derive(Debug, Clone, Copy, Default)]
pub struct Library;

impl ResourceAdapter for Library {
    fn type_name(&self) -> &'static str {
        "Library"
    }

    fn collection(&self) -> &'static str {
        "library"
    }

    fn location_key(&self) -> &'static str {
        "location.modules"
    }

    fn remote_key(&self, fields: &Map<String, Value>) -> Option<ItemKey> {
        fields.get("name").and_then(Value::as_str).map(ItemKey::name)
    }

    /// The module name is the file name up to its first `.`.
    fn to_remote_key(&self, path: &Path) -> Result<Option<ItemKey>> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = file_name.split('.').next().unwrap_or_default();
        if name.is_empty() {
            tracing::warn!(path = %path.display(), "Not a library module");
            return Ok(None);
        }
        Ok(Some(ItemKey::name(name)))
    }

    fn local_name(&self, key: &ItemKey) -> String {
        match key {
            ItemKey::Name { name } => format!("{}.{}", name, SCRIPT_EXTENSION),
            ItemKey::Event { service, event } => {
                format!("{}_{}.{}", service, event, SCRIPT_EXTENSION)
            }
        }
    }

    fn synckey(&self, key: &ItemKey) -> String {
        match key {
            ItemKey::Name { name } => name.clone(),
            ItemKey::Event { service, event } => format!("{}_{}", service, event),
        }
    }
}
