//! Collaborator boundaries consumed by the guard.
//!
//! Each trust source and side effect is an injected capability so tests and
//! hosts can substitute their own without touching shared process state.

use crate::session::{Session, SessionError};
use async_trait::async_trait;

/// Read-only view of the local "demo mode" flag.
///
/// The flag lives outside any single activation and may be flipped by code
/// the guard knows nothing about, so implementations must answer from the
/// current stored value on every call.
pub trait DemoModeFlag: Send + Sync {
    /// Whether demo mode is currently enabled.
    fn is_enabled(&self) -> bool;
}

/// Asynchronous source of the current remote session.
///
/// # Example
///
/// ```rust,ignore
/// use clinigate_guard::{Session, SessionError, SessionSource};
/// use async_trait::async_trait;
///
/// struct AlwaysSignedIn;
///
/// #[async_trait]
/// impl SessionSource for AlwaysSignedIn {
///     async fn current_session(&self) -> Result<Option<Session>, SessionError> {
///         Ok(Some(Session::new("user_123")))
///     }
/// }
/// ```
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Fetch the current session, `None` when signed out.
    async fn current_session(&self) -> Result<Option<Session>, SessionError>;
}

/// Client-side navigation sink.
pub trait Navigator: Send + Sync {
    /// Navigate to `path`. Fire-and-forget.
    fn redirect_to(&self, path: &str);
}

/// Session inactivity timer owned by the host.
///
/// The guard only toggles it; the timing policy lives elsewhere.
pub trait InactivityTimer: Send + Sync {
    /// Start watching for inactivity.
    fn enable(&self);
    /// Stop watching for inactivity.
    fn disable(&self);
}
