//! In-process doubles for the guard's collaborators.
//!
//! Every double is `Clone`; clones share state, so one handle goes into the
//! guard and another stays with the test for assertions.

use async_trait::async_trait;
use clinigate_guard::{
    DemoModeFlag, InactivityTimer, Navigator, Session, SessionError, SessionSource,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Demo flag that counts how often it is read.
#[derive(Debug, Clone, Default)]
pub struct CountingDemoFlag {
    enabled: Arc<AtomicBool>,
    reads: Arc<AtomicUsize>,
}

impl CountingDemoFlag {
    /// Create a flag with the given value.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(enabled)),
            reads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Change the stored value, as an external login/logout flow would.
    pub fn store(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Number of reads so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl DemoModeFlag for CountingDemoFlag {
    fn is_enabled(&self) -> bool {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.enabled.load(Ordering::SeqCst)
    }
}

/// Session source with a fixed answer, a call counter and an optional hold.
///
/// A held source does not answer until [`release`](Self::release) is called,
/// which lets a test deactivate a view while the lookup is in flight.
#[derive(Debug, Clone)]
pub struct ScriptedSessionSource {
    answer: Result<Option<Session>, SessionError>,
    gate: Option<Arc<Notify>>,
    calls: Arc<AtomicUsize>,
    called: Arc<Notify>,
}

impl ScriptedSessionSource {
    fn answering(answer: Result<Option<Session>, SessionError>) -> Self {
        Self {
            answer,
            gate: None,
            calls: Arc::new(AtomicUsize::new(0)),
            called: Arc::new(Notify::new()),
        }
    }

    /// Always report `session`.
    pub fn signed_in(session: Session) -> Self {
        Self::answering(Ok(Some(session)))
    }

    /// Always report no session.
    pub fn signed_out() -> Self {
        Self::answering(Ok(None))
    }

    /// Always fail with `error`.
    pub fn failing(error: SessionError) -> Self {
        Self::answering(Err(error))
    }

    /// Hold every lookup until [`release`](Self::release).
    pub fn held(mut self) -> Self {
        self.gate = Some(Arc::new(Notify::new()));
        self
    }

    /// Let one held lookup answer.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    /// Number of lookups started.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Wait until at least one lookup has started.
    pub async fn wait_for_call(&self) {
        if self.calls() > 0 {
            return;
        }
        self.called.notified().await;
    }
}

#[async_trait]
impl SessionSource for ScriptedSessionSource {
    async fn current_session(&self) -> Result<Option<Session>, SessionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.called.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.answer.clone()
    }
}

/// Navigator that records every redirect.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    redirects: Arc<Mutex<Vec<String>>>,
}

impl RecordingNavigator {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths redirected to, in order.
    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }

    /// Number of redirects.
    pub fn count(&self) -> usize {
        self.redirects.lock().unwrap().len()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect_to(&self, path: &str) {
        self.redirects.lock().unwrap().push(path.to_string());
    }
}

/// A toggle observed by [`RecordingTimer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// `enable` was called.
    Enabled,
    /// `disable` was called.
    Disabled,
}

/// Inactivity timer that records enable/disable calls.
#[derive(Debug, Clone, Default)]
pub struct RecordingTimer {
    events: Arc<Mutex<Vec<TimerEvent>>>,
}

impl RecordingTimer {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles seen so far, in order.
    pub fn events(&self) -> Vec<TimerEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Whether the last toggle left the timer enabled.
    pub fn is_enabled(&self) -> bool {
        self.events.lock().unwrap().last() == Some(&TimerEvent::Enabled)
    }
}

impl InactivityTimer for RecordingTimer {
    fn enable(&self) {
        self.events.lock().unwrap().push(TimerEvent::Enabled);
    }

    fn disable(&self) {
        self.events.lock().unwrap().push(TimerEvent::Disabled);
    }
}
