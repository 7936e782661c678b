//! Layered settings with dotted-key lookup
//!
//! Layers are TOML files; an explicit settings file may also be JSON or YAML.

use std::path::{Path, PathBuf};

use solsync_fs::StructuredFile;
use toml::{Table, Value};

use crate::{Error, Result};

/// Name of the per-project state directory
pub const STATE_DIR: &str = ".solsync";

/// Merged settings from every configuration layer
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    table: Table,
    sources: Vec<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Settings {
    /// Built-in defaults (layer 1)
    pub fn defaults() -> Self {
        let table: Table = toml::from_str(
            r#"
[net]
timeout_secs = 30

[location]
modules = "modules"
eventhandlers = "eventhandlers"
"#,
        )
        .unwrap_or_default();
        Self {
            table,
            sources: Vec::new(),
        }
    }

    /// Parse settings from TOML text on top of the defaults.
    pub fn parse(content: &str) -> Result<Self> {
        let mut settings = Self::defaults();
        settings.merge(toml::from_str(content)?);
        Ok(settings)
    }

    /// Deep-merge `other` over these settings.
    pub fn merge(&mut self, other: Table) {
        deep_merge(&mut self.table, other);
    }

    /// Look up a dotted key such as `solution.id`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let mut parts = key.split('.');
        let first = parts.next()?;
        let mut current = self.table.get(first)?;
        for part in parts {
            current = current.as_table()?.get(part)?;
        }
        Some(current)
    }

    /// Look up a dotted key and render scalars as text.
    ///
    /// Tables and arrays are not settings values and yield `None`.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Integer(i) => Some(i.to_string()),
            Value::Float(f) => Some(f.to_string()),
            Value::Boolean(b) => Some(b.to_string()),
            Value::Datetime(d) => Some(d.to_string()),
            Value::Array(_) | Value::Table(_) => None,
        }
    }

    /// Like [`get_str`](Self::get_str) but a missing or blank value is an error.
    pub fn require(&self, key: &str) -> Result<String> {
        self.get_str(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::MissingSetting {
                key: key.to_string(),
            })
    }

    /// Files that contributed to these settings, in load order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    fn load_layer(&mut self, path: &Path, layer: &str) -> Result<()> {
        let file = StructuredFile::new(path)?;
        if !file.exists() {
            tracing::debug!(?path, layer, "No config found, skipping");
            return Ok(());
        }
        tracing::debug!(?path, layer, "Loading config");
        let table: Table = file.load()?;
        self.merge(table);
        self.sources.push(path.to_path_buf());
        Ok(())
    }
}

/// Recursively merge tables; any non-table value in `other` replaces `base`.
fn deep_merge(base: &mut Table, other: Table) {
    for (key, other_value) in other {
        match (base.get_mut(&key), other_value) {
            (Some(Value::Table(base_table)), Value::Table(other_table)) => {
                deep_merge(base_table, other_table);
            }
            (_, other_value) => {
                base.insert(key, other_value);
            }
        }
    }
}

/// Resolves [`Settings`] for one project by merging every layer
pub struct SettingsResolver {
    /// Project root (the directory holding `.solsync/`)
    root: PathBuf,

    /// Override for the global config directory (used for testing).
    /// When `None`, `dirs::config_dir()` is used.
    global_config_dir_override: Option<PathBuf>,

    /// Explicit settings file (layer 5)
    explicit_file: Option<PathBuf>,
}

impl SettingsResolver {
    /// Create a resolver for `root`, honouring `SOLSYNC_CONFIG` if set.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            global_config_dir_override: None,
            explicit_file: std::env::var_os("SOLSYNC_CONFIG").map(PathBuf::from),
        }
    }

    /// Use a custom global config directory instead of the platform one.
    pub fn with_global_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.global_config_dir_override = Some(dir.into());
        self
    }

    /// Replace the explicit settings file (or disable it with `None`).
    pub fn with_explicit_file(mut self, file: Option<PathBuf>) -> Self {
        self.explicit_file = file;
        self
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref dir) = self.global_config_dir_override {
            return Some(dir.clone());
        }
        dirs::config_dir().map(|d| d.join("solsync"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check if a project configuration exists
    pub fn has_config(&self) -> bool {
        self.root.join(STATE_DIR).join("config.toml").is_file()
    }

    /// Merge all layers in order. Missing layers are skipped; a present
    /// layer that cannot be parsed is an error.
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = Settings::defaults();

        if let Some(global_dir) = self.global_config_dir() {
            settings.load_layer(&global_dir.join("config.toml"), "global")?;
        }

        let state_dir = self.root.join(STATE_DIR);
        settings.load_layer(&state_dir.join("config.toml"), "project")?;
        settings.load_layer(&state_dir.join("config.local.toml"), "local")?;

        if let Some(ref explicit) = self.explicit_file {
            settings.load_layer(explicit, "explicit")?;
        }

        Ok(settings)
    }
}

/// Walk up from `start` to the first directory that contains `.solsync/`.
pub fn find_project_root(start: &Path) -> Result<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(STATE_DIR).is_dir())
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::ProjectNotFound {
            path: start.to_path_buf(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_provide_locations() {
        let settings = Settings::defaults();
        assert_eq!(settings.get_str("location.modules").as_deref(), Some("modules"));
        assert_eq!(settings.get_str("net.timeout_secs").as_deref(), Some("30"));
        assert!(settings.get("solution.id").is_none());
    }

    #[test]
    fn require_reports_missing_key() {
        let err = Settings::defaults().require("solution.id").unwrap_err();
        assert!(matches!(err, Error::MissingSetting { key } if key == "solution.id"));
    }

    #[test]
    fn merge_is_deep() {
        let mut settings = Settings::parse("[location]\nmodules = \"lib\"\n").unwrap();
        assert_eq!(settings.get_str("location.modules").as_deref(), Some("lib"));
        assert_eq!(
            settings.get_str("location.eventhandlers").as_deref(),
            Some("eventhandlers")
        );

        settings.merge(toml::from_str("[solution]\nid = \"abc\"\n").unwrap());
        assert_eq!(settings.get_str("solution.id").as_deref(), Some("abc"));
        assert_eq!(settings.get_str("location.modules").as_deref(), Some("lib"));
    }

    #[test]
    fn get_str_ignores_tables() {
        assert!(Settings::defaults().get_str("location").is_none());
    }

    #[test]
    fn find_project_root_walks_up() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join(STATE_DIR)).unwrap();
        let nested = temp.path().join("modules").join("deep");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&nested).unwrap(), temp.path());
    }

    #[test]
    fn find_project_root_fails_outside_project() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            find_project_root(temp.path()),
            Err(Error::ProjectNotFound { .. })
        ));
    }
}
