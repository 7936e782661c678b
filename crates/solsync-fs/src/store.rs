//! Format-agnostic structured files (TOML, JSON, YAML)

use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, Result, io};

/// Serialization format of a structured file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
    Yaml,
}

impl Format {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(Error::UnsupportedFormat { extension }),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
            Self::Yaml => "YAML",
        }
    }
}

/// A structured file on disk.
///
/// Loads and saves any serde type; saves are atomic.
#[derive(Debug, Clone)]
pub struct StructuredFile {
    path: PathBuf,
    format: Format,
}

impl StructuredFile {
    /// Bind to `path`, detecting the format from its extension.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = Format::from_path(&path)?;
        Ok(Self { path, format })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Parse text already read from this file.
    pub fn parse<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        let parsed = match self.format {
            Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|message| Error::Parse {
            path: self.path.clone(),
            format: self.format.name().into(),
            message,
        })
    }

    /// Load and parse the file.
    pub fn load<T: DeserializeOwned>(&self) -> Result<T> {
        let content = io::read_text(&self.path)?;
        self.parse(&content)
    }

    /// Serialize `value` and write it atomically.
    pub fn save<T: Serialize>(&self, value: &T) -> Result<()> {
        let content = match self.format {
            Format::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            Format::Json => serde_json::to_string_pretty(value).map_err(|e| e.to_string()),
            Format::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        }
        .map_err(|message| Error::Serialize {
            path: self.path.clone(),
            format: self.format.name().into(),
            message,
        })?;

        io::write_atomic(&self.path, content.as_bytes())
    }
}
