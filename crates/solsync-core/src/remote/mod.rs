//! Remote client abstraction
//!
//! The sync engine talks to the server exclusively through [`RemoteClient`],
//! a blocking JSON request/response interface. Paths are relative to the
//! solution endpoint (for example `library/` or `library/<alias>`).
//!
//! [`HttpRemote`] is the production implementation; tests substitute an
//! in-memory fake.

mod auth;
mod http;

pub use auth::{Authenticator, PasswordLogin, StaticToken};
pub use http::{HttpRemote, RemoteOptions};

use serde_json::Value;

/// HTTP verb of a remote call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Put,
    Post,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        })
    }
}

/// Failure of a remote call
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The addressed item or collection does not exist (HTTP 404)
    #[error("Not found: {path}")]
    NotFound { path: String },

    /// Any other non-success status; body kept for diagnostics
    #[error("{method} {path} failed with status {status}: {body}")]
    Status {
        method: Method,
        path: String,
        status: u16,
        body: String,
    },

    /// The request could not complete (connection, TLS, timeout)
    #[error("Transport error for {path}: {message}")]
    Transport { path: String, message: String },

    /// No usable credentials
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// The server answered with a body that is not valid JSON
    #[error("Invalid response body from {path}: {message}")]
    Decode { path: String, message: String },
}

impl RemoteError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// HTTP status and body, when the server answered at all.
    pub fn status(&self) -> Option<(u16, &str)> {
        match self {
            Self::NotFound { .. } => Some((404, "")),
            Self::Status { status, body, .. } => Some((*status, body.as_str())),
            _ => None,
        }
    }
}

/// Result of a remote call
pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

/// Authenticated JSON request/response client
///
/// Implementations inject credentials on every call and must report a 404 as
/// [`RemoteError::NotFound`]: the upload protocol depends on telling it apart
/// from other failures.
pub trait RemoteClient: Send + Sync {
    fn get(&self, path: &str) -> RemoteResult<Value>;

    fn put(&self, path: &str, payload: &Value) -> RemoteResult<Value>;

    fn post(&self, path: &str, payload: &Value) -> RemoteResult<Value>;

    fn delete(&self, path: &str) -> RemoteResult<Value>;
}
