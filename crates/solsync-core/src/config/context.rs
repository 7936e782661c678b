//! Explicit context handed to the sync engine and resource adapters

use std::path::{Path, PathBuf};
use std::time::Duration;

use toml::Value;

use super::settings::{STATE_DIR, Settings};
use crate::resource::SkipList;
use crate::{Error, Result};

/// Everything the sync core needs to know about the current project.
///
/// Replaces any notion of process-wide configuration: adapters and engines
/// receive one of these at construction and never look anywhere else.
#[derive(Debug, Clone)]
pub struct SyncContext {
    solution_id: String,
    skiplist: SkipList,
    project_root: PathBuf,
    state_dir: PathBuf,
    settings: Settings,
}

impl SyncContext {
    /// Context with default settings, for a given solution and project root.
    pub fn new(solution_id: impl Into<String>, project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        Self {
            solution_id: solution_id.into(),
            skiplist: SkipList::default(),
            state_dir: project_root.join(STATE_DIR),
            project_root,
            settings: Settings::defaults(),
        }
    }

    /// Build a context from resolved settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSetting`] if `solution.id` is not configured
    /// and [`Error::InvalidSetting`] if `eventhandler.skiplist` is neither a
    /// string nor an array of strings.
    pub fn from_settings(settings: &Settings, project_root: impl Into<PathBuf>) -> Result<Self> {
        let solution_id = settings.require("solution.id")?;
        let skiplist = skiplist_from(settings)?;
        let mut ctx = Self::new(solution_id, project_root).with_skiplist(skiplist);
        ctx.settings = settings.clone();
        Ok(ctx)
    }

    pub fn with_skiplist(mut self, skiplist: SkipList) -> Self {
        self.skiplist = skiplist;
        self
    }

    pub fn solution_id(&self) -> &str {
        &self.solution_id
    }

    pub fn skiplist(&self) -> &SkipList {
        &self.skiplist
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Path of a state file inside the project's `.solsync/` directory.
    pub fn file_at(&self, name: &str) -> PathBuf {
        self.state_dir.join(name)
    }

    /// Local directory configured under `key` (e.g. `location.modules`),
    /// resolved against the project root.
    pub fn location(&self, key: &str) -> Result<PathBuf> {
        let dir = self.settings.require(key)?;
        Ok(self.project_root.join(dir))
    }

    /// Request timeout from `net.timeout_secs`.
    pub fn timeout(&self) -> Result<Duration> {
        let Some(raw) = self.settings.get_str("net.timeout_secs") else {
            return Ok(Duration::from_secs(30));
        };
        raw.parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| Error::InvalidSetting {
                key: "net.timeout_secs".into(),
                message: e.to_string(),
            })
    }
}

const SKIPLIST_KEY: &str = "eventhandler.skiplist";

/// `"timer device.datapoint"` and `["timer", "device.datapoint"]` are the same list.
fn skiplist_from(settings: &Settings) -> Result<SkipList> {
    let invalid = |found: &str| Error::InvalidSetting {
        key: SKIPLIST_KEY.into(),
        message: format!("expected a string or an array of strings, got {}", found),
    };
    match settings.get(SKIPLIST_KEY) {
        None => Ok(SkipList::default()),
        Some(Value::String(text)) => Ok(SkipList::parse(text)),
        Some(Value::Array(entries)) => {
            let mut words = Vec::with_capacity(entries.len());
            for entry in entries {
                let Value::String(word) = entry else {
                    return Err(invalid(&format!("an array containing {}", entry.type_str())));
                };
                words.push(word.as_str());
            }
            Ok(SkipList::parse(&words.join(" ")))
        }
        Some(other) => Err(invalid(other.type_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_at_resolves_into_state_dir() {
        let ctx = SyncContext::new("sol", "/work/project");
        assert_eq!(
            ctx.file_at("cache.Library.yaml"),
            PathBuf::from("/work/project/.solsync/cache.Library.yaml")
        );
    }

    #[test]
    fn from_settings_requires_solution_id() {
        let err = SyncContext::from_settings(&Settings::defaults(), "/p").unwrap_err();
        assert!(matches!(err, Error::MissingSetting { .. }));
    }

    #[test]
    fn from_settings_reads_skiplist_and_locations() {
        let settings = Settings::parse(
            r#"
[solution]
id = "abc"

[eventhandler]
skiplist = "timer device.datapoint"

[location]
modules = "src/modules"
"#,
        )
        .unwrap();
        let ctx = SyncContext::from_settings(&settings, "/p").unwrap();

        assert_eq!(ctx.solution_id(), "abc");
        assert!(ctx.skiplist().excludes("timer", "tick"));
        assert!(ctx.skiplist().excludes("device", "datapoint"));
        assert!(!ctx.skiplist().excludes("device", "other"));
        assert_eq!(
            ctx.location("location.modules").unwrap(),
            PathBuf::from("/p/src/modules")
        );
    }

    #[test]
    fn skiplist_may_be_an_array() {
        let settings = Settings::parse(
            "[solution]\nid = \"a\"\n[eventhandler]\nskiplist = [\"timer\", \"device.datapoint\"]\n",
        )
        .unwrap();
        let ctx = SyncContext::from_settings(&settings, "/p").unwrap();

        assert_eq!(ctx.skiplist(), &SkipList::parse("timer device.datapoint"));
    }

    #[test]
    fn skiplist_of_another_type_is_reported() {
        for value in ["42", "[\"timer\", 3]", "{ service = \"timer\" }"] {
            let settings = Settings::parse(&format!(
                "[solution]\nid = \"a\"\n[eventhandler]\nskiplist = {}\n",
                value
            ))
            .unwrap();
            let err = SyncContext::from_settings(&settings, "/p").unwrap_err();
            assert!(
                matches!(&err, Error::InvalidSetting { key, .. } if key == "eventhandler.skiplist"),
                "{value}: {err:?}"
            );
        }
    }

    #[test]
    fn invalid_timeout_is_reported() {
        let settings = Settings::parse("[solution]\nid = \"a\"\n[net]\ntimeout_secs = \"soon\"\n").unwrap();
        let ctx = SyncContext::from_settings(&settings, "/p").unwrap();
        assert!(matches!(ctx.timeout(), Err(Error::InvalidSetting { .. })));
    }
}
