//! Remote session records and the errors a session source may report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A session as reported by the backing auth provider.
///
/// Presence of a session is all the guard needs; the fields are carried for
/// callers that want to show who is signed in.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Provider-side user identifier.
    #[serde(alias = "id")]
    pub user_id: String,
    /// Email address, when the provider exposes it.
    #[serde(default)]
    pub email: Option<String>,
    /// Expiry reported by the provider.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Access token; redacted from `Debug` output.
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,
}

impl Session {
    /// Create a session with just a user id.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
            expires_at: None,
            access_token: None,
        }
    }

    /// Attach an email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Attach an expiry.
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("expires_at", &self.expires_at)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Reasons a session lookup could not complete.
///
/// The guard treats every variant exactly like "no session"; the distinction
/// only reaches logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The provider could not be reached.
    #[error("Session transport failed: {0}")]
    Transport(String),

    /// The provider answered with an unexpected status code.
    #[error("Session endpoint returned status {0}")]
    Status(u16),

    /// The provider's answer could not be parsed.
    #[error("Malformed session response: {0}")]
    Malformed(String),

    /// The session source is misconfigured or otherwise unusable.
    #[error("Session source unavailable: {0}")]
    Unavailable(String),
}

impl SessionError {
    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a malformed response error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_access_token() {
        let mut session = Session::new("u-1");
        session.access_token = Some("eyJhbGciOi.secret".to_string());
        let rendered = format!("{:?}", session);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn deserializes_provider_shape() {
        let session: Session = serde_json::from_str(
            r#"{"id": "abc", "email": "dr@example.org", "expires_at": "2026-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(session.user_id, "abc");
        assert_eq!(session.email.as_deref(), Some("dr@example.org"));
        assert!(session.expires_at.is_some());
        assert!(session.access_token.is_none());
    }

    #[test]
    fn serializing_never_emits_the_token() {
        let mut session = Session::new("u-2");
        session.access_token = Some("tok".to_string());
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("tok"));
    }
}
