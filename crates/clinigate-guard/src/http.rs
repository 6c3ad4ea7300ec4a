//! Session source backed by an HTTP endpoint.
//!
//! The endpoint is expected to answer `GET` with the current session as a
//! JSON object, `null` when signed out, or 401/403/404 when there is no
//! session for the presented credentials.

use crate::ports::SessionSource;
use crate::session::{Session, SessionError};
use async_trait::async_trait;
use reqwest::{header, StatusCode};
use std::time::Duration;

/// Default timeout for a session lookup.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(5);

/// [`SessionSource`] that asks a remote auth provider over HTTP.
#[derive(Clone)]
pub struct HttpSessionSource {
    client: reqwest::Client,
    endpoint: String,
    bearer: Option<String>,
}

impl std::fmt::Debug for HttpSessionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSessionSource")
            .field("endpoint", &self.endpoint)
            .field("bearer", &self.bearer.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl HttpSessionSource {
    /// Create a source for `endpoint` with the default timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SessionError> {
        Self::with_timeout(endpoint, DEFAULT_SESSION_TIMEOUT)
    }

    /// Create a source for `endpoint` with a custom request timeout.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SessionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SessionError::Unavailable(e.to_string()))?;
        Ok(Self::with_client(client, endpoint))
    }

    /// Create a source that reuses an existing client.
    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            bearer: None,
        }
    }

    /// Present a bearer token with each lookup.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// The configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl SessionSource for HttpSessionSource {
    async fn current_session(&self) -> Result<Option<Session>, SessionError> {
        let mut request = self
            .client
            .get(&self.endpoint)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SessionError::transport(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| SessionError::transport(e.to_string()))?;
                if body.iter().all(u8::is_ascii_whitespace) {
                    return Ok(None);
                }
                serde_json::from_slice::<Option<Session>>(&body)
                    .map_err(|e| SessionError::malformed(e.to_string()))
            }
            status => Err(SessionError::Status(status.as_u16())),
        }
    }
}
