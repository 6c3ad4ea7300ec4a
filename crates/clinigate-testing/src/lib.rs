//! Testing utilities for clinigate
//!
//! - [`doubles`]: in-process stand-ins for the guard's collaborators
//!   (demo flag, session source, navigator, inactivity timer)
//! - [`MockServer`]: a local HTTP server that plays the auth provider's
//!   session endpoint

pub mod doubles;
pub mod expectation;
pub mod matcher;
pub mod server;

pub use doubles::{
    CountingDemoFlag, RecordingNavigator, RecordingTimer, ScriptedSessionSource, TimerEvent,
};
pub use expectation::{Expectation, MockResponse, Times};
pub use matcher::RequestMatcher;
pub use server::{MockServer, RecordedRequest};
