//! Credential injection for remote calls

use std::sync::Mutex;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use super::{RemoteError, RemoteResult};

/// Supplies the token attached to every remote call.
pub trait Authenticator: Send + Sync {
    fn token(&self) -> RemoteResult<String>;
}

/// A pre-issued token.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl Authenticator for StaticToken {
    fn token(&self) -> RemoteResult<String> {
        if self.0.is_empty() {
            return Err(RemoteError::Auth("empty token".into()));
        }
        Ok(self.0.clone())
    }
}

fn token_endpoint(origin: &str) -> String {
    format!("{}/api:1/token/", origin.trim_end_matches('/'))
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

/// Exchanges account credentials for a token on first use.
///
/// The token is kept for the lifetime of this value; nothing is persisted.
pub struct PasswordLogin {
    client: Client,
    endpoint: String,
    email: String,
    password: String,
    token: Mutex<Option<String>>,
}

impl PasswordLogin {
    /// Create a login against `https://<host>/api:1/token/`.
    pub fn new(
        host: &str,
        email: impl Into<String>,
        password: impl Into<String>,
        timeout: Duration,
    ) -> RemoteResult<Self> {
        let endpoint = token_endpoint(&format!("https://{}", host));
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| RemoteError::Transport {
                path: endpoint.clone(),
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            endpoint,
            email: email.into(),
            password: password.into(),
            token: Mutex::new(None),
        })
    }

    /// Request the token from `origin` (for example `http://127.0.0.1:8080`)
    /// instead of `https://<host>`.
    pub fn with_base_url(mut self, origin: &str) -> Self {
        self.endpoint = token_endpoint(origin);
        self
    }

    fn exchange(&self) -> RemoteResult<String> {
        tracing::debug!(endpoint = %self.endpoint, email = %self.email, "Requesting token");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "email": self.email, "password": self.password }))
            .send()
            .map_err(|e| RemoteError::Transport {
                path: self.endpoint.clone(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RemoteError::Auth(format!(
                "token request returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: TokenResponse = response.json().map_err(|e| RemoteError::Decode {
            path: self.endpoint.clone(),
            message: e.to_string(),
        })?;
        Ok(parsed.token)
    }
}

impl Authenticator for PasswordLogin {
    fn token(&self) -> RemoteResult<String> {
        let mut cached = self
            .token
            .lock()
            .map_err(|_| RemoteError::Auth("token cache poisoned".into()))?;
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }
        let token = self.exchange()?;
        *cached = Some(token.clone());
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_token_returns_value() {
        assert_eq!(StaticToken::new("abc").token().unwrap(), "abc");
    }

    #[test]
    fn token_endpoint_follows_origin() {
        let login = PasswordLogin::new("api.example.com", "a@b.c", "pw", Duration::from_secs(1))
            .unwrap();
        assert_eq!(login.endpoint, "https://api.example.com/api:1/token/");
        let login = login.with_base_url("http://127.0.0.1:8080/");
        assert_eq!(login.endpoint, "http://127.0.0.1:8080/api:1/token/");
    }

    #[test]
    fn empty_static_token_is_auth_error() {
        assert!(StaticToken::new("").token().unwrap_err().is_auth());
    }
}
