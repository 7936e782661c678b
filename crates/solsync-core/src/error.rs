//! Error types for solsync-core

use crate::remote::RemoteError;

/// Result type for solsync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in solsync-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required setting was not configured
    #[error("Missing setting: {key}")]
    MissingSetting { key: String },

    /// A setting was present but unusable
    #[error("Invalid setting {key}: {message}")]
    InvalidSetting { key: String, message: String },

    /// No project directory was found above the working directory
    #[error("No solsync project found at or above {path}")]
    ProjectNotFound { path: std::path::PathBuf },

    /// Upload was rejected by the server with something other than "not found"
    #[error("Upload of {alias} failed with status {status}: {body}")]
    Upload {
        alias: String,
        status: u16,
        body: String,
    },

    /// A textual timestamp could not be parsed
    #[error("Invalid timestamp: {value}")]
    InvalidTimestamp { value: String },

    /// Neither side of a comparison carried enough to resolve a timestamp
    #[error("No timestamp available for {what}")]
    MissingTimestamp { what: String },

    /// The server answered with JSON of an unexpected shape
    #[error("Unexpected response from {path}: {message}")]
    InvalidResponse { path: String, message: String },

    // Transparent wrappers for underlying errors
    /// Filesystem error from solsync-fs
    #[error(transparent)]
    Fs(#[from] solsync_fs::Error),

    /// Remote call failure
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// YAML value conversion error
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

impl Error {
    /// True when the server could not be reached at all.
    ///
    /// Batch operations abort on these instead of recording a per-item failure.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Remote(e) if e.is_transport() || e.is_auth())
    }
}
