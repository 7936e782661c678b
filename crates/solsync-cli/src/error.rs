//! Error types for solsync-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from solsync-core
    #[error(transparent)]
    Core(#[from] solsync_core::Error),

    /// Remote client could not be set up
    #[error(transparent)]
    Remote(#[from] solsync_core::RemoteError),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_display_unchanged() {
        let core = solsync_core::Error::MissingSetting {
            key: "net.host".into(),
        };
        assert_eq!(CliError::from(core).to_string(), "Missing setting: net.host");

        let remote = solsync_core::RemoteError::Auth("empty token".into());
        assert_eq!(
            CliError::from(remote).to_string(),
            "Authentication failed: empty token"
        );
        assert_eq!(CliError::user("No project").to_string(), "No project");
    }
}
