//! # clinigate-guard
//!
//! Client-side route authorization for protected clinical views.
//!
//! A guard consults two trust sources in a fixed order: a local "demo mode"
//! flag, read synchronously, and a remote session, fetched asynchronously only
//! when the flag is not set. Until an answer exists the view renders a neutral
//! loading state. Without a session, or when the session lookup fails in any
//! way, the guard denies and redirects to the login path once.
//!
//! ## Features
//!
//! - `http` - [`HttpSessionSource`](http::HttpSessionSource), a `reqwest`
//!   based session source
//!
//! ## Example
//!
//! ```rust,ignore
//! use clinigate_guard::{AuthGuard, Decision, MemoryDemoFlag};
//!
//! let demo = MemoryDemoFlag::new();
//! let guard = AuthGuard::builder()
//!     .demo_flag(demo.clone())
//!     .session_source(sessions)
//!     .navigator(router)
//!     .build();
//!
//! let activation = guard.activate();
//! if activation.resolve().await == Decision::Authorized {
//!     // render the chart
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod decision;
pub mod flag;
pub mod guard;
pub mod ports;
pub mod session;

#[cfg(feature = "http")]
pub mod http;

pub use decision::{ActivationId, Decision, Rendered};
pub use flag::{FileDemoFlag, FlagError, MemoryDemoFlag, DEMO_MODE_KEY};
pub use guard::{Activation, AuthGuard, AuthGuardBuilder, GuardConfig, DEFAULT_LOGIN_PATH};
pub use ports::{DemoModeFlag, InactivityTimer, Navigator, SessionSource};
pub use session::{Session, SessionError};

#[cfg(feature = "http")]
pub use http::HttpSessionSource;
