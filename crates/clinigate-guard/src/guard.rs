//! The route authorization guard.
//!
//! Each time a protected view becomes active the host calls
//! [`AuthGuard::activate`]. The demo flag is read right there, synchronously;
//! if it is set the activation is authorized and no remote call is ever made.
//! Otherwise the activation stays [`Decision::Pending`] until
//! [`Activation::resolve`] (or [`Activation::spawn`]) asks the session source.
//!
//! While pending the view renders a loading indicator. A session authorizes;
//! no session, no configured source, or any failure of the source denies and
//! redirects to the login path exactly once.
//!
//! # Example
//!
//! ```rust,ignore
//! use clinigate_guard::{AuthGuard, MemoryDemoFlag, Rendered};
//!
//! let guard = AuthGuard::builder()
//!     .demo_flag(MemoryDemoFlag::new())
//!     .session_source(my_sessions)
//!     .navigator(my_router)
//!     .build();
//!
//! let activation = guard.activate();
//! activation.resolve().await;
//! match activation.render(|| "patient chart") {
//!     Rendered::Content(view) => show(view),
//!     Rendered::Loading => spinner(),
//!     Rendered::Nothing => {}
//! }
//! ```

use crate::decision::{ActivationId, Decision, Rendered};
use crate::flag::MemoryDemoFlag;
use crate::ports::{DemoModeFlag, InactivityTimer, Navigator, SessionSource};
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;

/// Default login entry point used for redirects.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Guard configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Where denied activations are sent.
    pub login_path: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_string(),
        }
    }
}

impl GuardConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the login path.
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }
}

struct GuardInner {
    demo_flag: Arc<dyn DemoModeFlag>,
    sessions: Option<Arc<dyn SessionSource>>,
    navigator: Arc<dyn Navigator>,
    timer: Option<Arc<dyn InactivityTimer>>,
    config: GuardConfig,
    next_id: AtomicU64,
    current: Mutex<Weak<ActivationShared>>,
}

/// Authorization guard for one protected view.
///
/// Cheap to clone; clones share the same collaborators and activation
/// sequence, so activating through any clone supersedes the previous
/// activation.
#[derive(Clone)]
pub struct AuthGuard {
    inner: Arc<GuardInner>,
}

impl std::fmt::Debug for AuthGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGuard")
            .field("config", &self.inner.config)
            .field("has_session_source", &self.inner.sessions.is_some())
            .field("has_inactivity_timer", &self.inner.timer.is_some())
            .finish()
    }
}

impl AuthGuard {
    /// Start building a guard.
    pub fn builder() -> AuthGuardBuilder {
        AuthGuardBuilder::default()
    }

    /// The guard's configuration.
    pub fn config(&self) -> &GuardConfig {
        &self.inner.config
    }

    /// Begin a new activation of the protected view.
    ///
    /// Any earlier activation of this guard that is still live is deactivated
    /// first. The demo flag is then read fresh; when set, the returned
    /// activation is already [`Decision::Authorized`].
    pub fn activate(&self) -> Activation {
        let id = ActivationId(self.inner.next_id.fetch_add(1, Ordering::Relaxed) + 1);

        let demo = self.inner.demo_flag.is_enabled();
        let decision = if demo {
            Decision::Authorized
        } else {
            Decision::Pending
        };

        let shared = Arc::new(ActivationShared {
            id,
            guard: Arc::clone(&self.inner),
            state: Mutex::new(ActivationState {
                decision,
                live: true,
                redirected: false,
                timer_enabled: false,
            }),
            outcome: OnceCell::new(),
        });

        let previous = {
            let mut current = lock(&self.inner.current);
            std::mem::replace(&mut *current, Arc::downgrade(&shared))
        };
        if let Some(previous) = previous.upgrade() {
            tracing::debug!(activation = %previous.id, superseded_by = %id, "activation superseded");
            previous.deactivate();
        }

        if demo {
            tracing::debug!(activation = %id, "demo mode set; authorized without remote check");
        } else {
            tracing::debug!(activation = %id, "activation pending remote session check");
        }

        Activation { shared }
    }
}

/// Builder for [`AuthGuard`].
#[derive(Default)]
pub struct AuthGuardBuilder {
    demo_flag: Option<Arc<dyn DemoModeFlag>>,
    sessions: Option<Arc<dyn SessionSource>>,
    navigator: Option<Arc<dyn Navigator>>,
    timer: Option<Arc<dyn InactivityTimer>>,
    config: GuardConfig,
}

impl AuthGuardBuilder {
    /// Set the demo flag. Defaults to a disabled [`MemoryDemoFlag`].
    pub fn demo_flag<F: DemoModeFlag + 'static>(self, flag: F) -> Self {
        self.demo_flag_arc(Arc::new(flag))
    }

    /// Set a shared demo flag.
    pub fn demo_flag_arc(mut self, flag: Arc<dyn DemoModeFlag>) -> Self {
        self.demo_flag = Some(flag);
        self
    }

    /// Set the remote session source. Without one every non-demo activation
    /// is denied.
    pub fn session_source<S: SessionSource + 'static>(self, source: S) -> Self {
        self.session_source_arc(Arc::new(source))
    }

    /// Set a shared remote session source.
    pub fn session_source_arc(mut self, source: Arc<dyn SessionSource>) -> Self {
        self.sessions = Some(source);
        self
    }

    /// Set the navigation sink. Defaults to one that only logs.
    pub fn navigator<N: Navigator + 'static>(self, navigator: N) -> Self {
        self.navigator_arc(Arc::new(navigator))
    }

    /// Set a shared navigation sink.
    pub fn navigator_arc(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Set the inactivity timer toggled on session-backed authorization.
    pub fn inactivity_timer<T: InactivityTimer + 'static>(self, timer: T) -> Self {
        self.inactivity_timer_arc(Arc::new(timer))
    }

    /// Set a shared inactivity timer.
    pub fn inactivity_timer_arc(mut self, timer: Arc<dyn InactivityTimer>) -> Self {
        self.timer = Some(timer);
        self
    }

    /// Set the configuration.
    pub fn config(mut self, config: GuardConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the guard.
    pub fn build(self) -> AuthGuard {
        AuthGuard {
            inner: Arc::new(GuardInner {
                demo_flag: self
                    .demo_flag
                    .unwrap_or_else(|| Arc::new(MemoryDemoFlag::new())),
                sessions: self.sessions,
                navigator: self.navigator.unwrap_or_else(|| Arc::new(LogOnlyNavigator)),
                timer: self.timer,
                config: self.config,
                next_id: AtomicU64::new(0),
                current: Mutex::new(Weak::new()),
            }),
        }
    }
}

struct LogOnlyNavigator;

impl Navigator for LogOnlyNavigator {
    fn redirect_to(&self, path: &str) {
        tracing::warn!(path, "redirect requested but no navigator configured");
    }
}

struct ActivationState {
    decision: Decision,
    live: bool,
    // One-shot latch for the login redirect.
    redirected: bool,
    timer_enabled: bool,
}

struct ActivationShared {
    id: ActivationId,
    guard: Arc<GuardInner>,
    state: Mutex<ActivationState>,
    // At most one remote check per activation, shared by concurrent resolvers.
    outcome: OnceCell<Decision>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ActivationShared {
    fn decision(&self) -> Decision {
        lock(&self.state).decision
    }

    async fn resolve(&self) -> Decision {
        {
            let state = lock(&self.state);
            if state.decision.is_terminal() || !state.live {
                return state.decision;
            }
        }

        let outcome = *self.outcome.get_or_init(|| self.check_remote()).await;
        self.apply(outcome)
    }

    async fn check_remote(&self) -> Decision {
        let Some(sessions) = self.guard.sessions.as_ref() else {
            tracing::info!(activation = %self.id, "no session source configured; denying");
            return Decision::Denied;
        };

        let lookup = AssertUnwindSafe(sessions.current_session()).catch_unwind();
        match lookup.await {
            Ok(Ok(Some(_))) => Decision::Authorized,
            Ok(Ok(None)) => {
                tracing::info!(activation = %self.id, "no active session; denying");
                Decision::Denied
            }
            Ok(Err(err)) => {
                tracing::warn!(activation = %self.id, error = %err, "session check failed; denying");
                Decision::Denied
            }
            Err(_) => {
                tracing::warn!(activation = %self.id, "session source panicked; denying");
                Decision::Denied
            }
        }
    }

    fn apply(&self, next: Decision) -> Decision {
        let (fire_redirect, enable_timer) = {
            let mut state = lock(&self.state);
            if !state.live {
                tracing::debug!(
                    activation = %self.id,
                    discarded = %next,
                    "resolution arrived after deactivation; discarded"
                );
                return state.decision;
            }
            if state.decision.is_terminal() {
                return state.decision;
            }

            state.decision = next;
            let fire_redirect = next == Decision::Denied && !state.redirected;
            if fire_redirect {
                state.redirected = true;
            }
            let enable_timer = next == Decision::Authorized && self.guard.timer.is_some();
            if enable_timer {
                state.timer_enabled = true;
            }
            (fire_redirect, enable_timer)
        };

        tracing::debug!(activation = %self.id, decision = %next, "activation resolved");

        if fire_redirect {
            self.guard.navigator.redirect_to(&self.guard.config.login_path);
        }
        if enable_timer {
            if let Some(timer) = &self.guard.timer {
                timer.enable();
            }
        }

        next
    }

    fn deactivate(&self) {
        let disable_timer = {
            let mut state = lock(&self.state);
            if !state.live {
                return;
            }
            state.live = false;
            std::mem::take(&mut state.timer_enabled)
        };

        tracing::debug!(activation = %self.id, "activation deactivated");

        if disable_timer {
            if let Some(timer) = &self.guard.timer {
                timer.disable();
            }
        }
    }

    fn is_live(&self) -> bool {
        lock(&self.state).live
    }
}

/// One activation of a protected view.
///
/// Dropping the activation deactivates it, the same as unmounting the view.
pub struct Activation {
    shared: Arc<ActivationShared>,
}

impl std::fmt::Debug for Activation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Activation")
            .field("id", &self.shared.id)
            .field("decision", &self.shared.decision())
            .field("live", &self.shared.is_live())
            .finish()
    }
}

impl Activation {
    /// Identity of this activation.
    pub fn id(&self) -> ActivationId {
        self.shared.id
    }

    /// Current decision.
    pub fn decision(&self) -> Decision {
        self.shared.decision()
    }

    /// Whether the activation has not been deactivated or superseded.
    pub fn is_active(&self) -> bool {
        self.shared.is_live()
    }

    /// Run the remote session check if the activation is still pending and
    /// return the resulting decision.
    ///
    /// Concurrent callers share a single remote call. If the activation was
    /// deactivated before the answer arrived, the answer is discarded and the
    /// decision stays as it was.
    pub async fn resolve(&self) -> Decision {
        self.shared.resolve().await
    }

    /// Run [`resolve`](Self::resolve) as a background task on the current
    /// tokio runtime.
    ///
    /// The task keeps running if this handle is dropped, but its outcome is
    /// discarded because dropping deactivates the activation.
    pub fn spawn(&self) -> JoinHandle<Decision> {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move { shared.resolve().await })
    }

    /// Gate the protected content on the current decision.
    ///
    /// `content` is only evaluated when authorized and still active. A
    /// deactivated or superseded activation renders nothing. Rendering never
    /// triggers navigation.
    pub fn render<T>(&self, content: impl FnOnce() -> T) -> Rendered<T> {
        let (decision, live) = {
            let state = lock(&self.shared.state);
            (state.decision, state.live)
        };
        if !live {
            return Rendered::Nothing;
        }
        match decision {
            Decision::Pending => Rendered::Loading,
            Decision::Authorized => Rendered::Content(content()),
            Decision::Denied => Rendered::Nothing,
        }
    }

    /// Deactivate explicitly (view unmounted or navigated away).
    pub fn deactivate(&self) {
        self.shared.deactivate();
    }
}

impl Drop for Activation {
    fn drop(&mut self) {
        self.shared.deactivate();
    }
}
