//! Blocking HTTP implementation of [`RemoteClient`] using reqwest

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;

use super::{Authenticator, Method, RemoteClient, RemoteError, RemoteResult};

/// Connection settings for [`HttpRemote`]
#[derive(Debug, Clone)]
pub struct RemoteOptions {
    pub host: String,
    pub solution_id: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Scheme and authority replacing `https://<host>`, e.g. a local server
    pub origin: Option<String>,
}

impl RemoteOptions {
    pub fn new(host: impl Into<String>, solution_id: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            solution_id: solution_id.into(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            origin: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Send requests to `origin` (for example `http://127.0.0.1:8080`)
    /// instead of `https://<host>`.
    pub fn with_base_url(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Scheme and authority of the API.
    pub fn origin(&self) -> String {
        match &self.origin {
            Some(origin) => origin.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.host),
        }
    }

    /// Root URL every relative path is joined onto.
    pub fn base_url(&self) -> String {
        format!("{}/api:1/solution/{}", self.origin(), self.solution_id)
    }
}

/// Remote client for `https://<host>/api:1/solution/<id>/...`
pub struct HttpRemote {
    client: Client,
    base: String,
    auth: Arc<dyn Authenticator>,
}

impl HttpRemote {
    pub fn new(options: &RemoteOptions, auth: Arc<dyn Authenticator>) -> RemoteResult<Self> {
        let base = options.base_url();
        let client = Client::builder()
            .timeout(options.timeout)
            .connect_timeout(options.connect_timeout)
            .user_agent(concat!("solsync/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::Transport {
                path: base.clone(),
                message: e.to_string(),
            })?;
        Ok(Self { client, base, auth })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    fn send(&self, method: Method, path: &str, payload: Option<&Value>) -> RemoteResult<Value> {
        let url = self.url(path);
        let token = self.auth.token()?;

        let builder: RequestBuilder = match method {
            Method::Get => self.client.get(&url),
            Method::Put => self.client.put(&url),
            Method::Post => self.client.post(&url),
            Method::Delete => self.client.delete(&url),
        };
        let mut builder = builder.header("Authorization", format!("token {}", token));
        if let Some(body) = payload {
            builder = builder.json(body);
        }

        tracing::debug!(%method, %url, "Sending request");
        let response = builder.send().map_err(|e| RemoteError::Transport {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        let body = response.text().map_err(|e| RemoteError::Transport {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        tracing::debug!(%method, %url, status = status.as_u16(), "Received response");

        if status == StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(RemoteError::Status {
                method,
                path: path.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| RemoteError::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}

impl RemoteClient for HttpRemote {
    fn get(&self, path: &str) -> RemoteResult<Value> {
        self.send(Method::Get, path, None)
    }

    fn put(&self, path: &str, payload: &Value) -> RemoteResult<Value> {
        self.send(Method::Put, path, Some(payload))
    }

    fn post(&self, path: &str, payload: &Value) -> RemoteResult<Value> {
        self.send(Method::Post, path, Some(payload))
    }

    fn delete(&self, path: &str) -> RemoteResult<Value> {
        self.send(Method::Delete, path, None)
    }
}
