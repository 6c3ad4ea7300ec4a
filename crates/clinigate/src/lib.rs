//! # clinigate
//!
//! The security boundary of a clinical web app.
//!
//! - **Sanitization**: recursive, idempotent cleanup of untrusted text and
//!   JSON payloads before they reach storage or rendering
//!   ([`clinigate_sanitize`]).
//! - **Route guarding**: a per-view authorization gate that trusts a local
//!   demo-mode flag first and a remote session second, redirecting to login
//!   when neither authorizes ([`clinigate_guard`]).
//! - **Configuration**: `.env` and `CLINIGATE_*` environment loading with a
//!   one-call guard builder ([`config`]).
//! - **Telemetry**: `tracing` subscriber setup per environment
//!   ([`telemetry`]).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use clinigate::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> clinigate::Result<()> {
//!     load_dotenv();
//!     init_tracing(&Environment::current())?;
//!
//!     let guard = GuardSettings::from_env()?.build_guard(router)?;
//!     let activation = guard.activate();
//!     activation.resolve().await;
//!
//!     let note = sanitize_text("<script>x()</script>Patient stable");
//!     assert_eq!(note, "Patient stable");
//!     Ok(())
//! }
//! ```
//!
//! ## Optional Features
//!
//! - `http` (default) - session lookups against an HTTP auth endpoint

#![warn(missing_docs)]

pub mod config;
pub mod telemetry;

pub use clinigate_guard as guard;
pub use clinigate_sanitize as sanitize;

pub use config::{
    env_or, env_parse, load_dotenv, load_dotenv_from, Config, ConfigError, Environment,
    GuardSettings,
};
pub use telemetry::init_tracing;

use thiserror::Error;

/// Errors surfaced by the facade.
#[derive(Debug, Error)]
pub enum Error {
    /// Loading or validating configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A payload could not be sanitized.
    #[error(transparent)]
    Sanitize(#[from] clinigate_sanitize::SanitizeError),

    /// The persisted demo flag could not be written.
    #[error(transparent)]
    Flag(#[from] clinigate_guard::FlagError),

    /// A global tracing subscriber could not be installed.
    #[error("Tracing initialization failed: {0}")]
    Telemetry(String),
}

/// Result type alias using the facade [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Prelude module - import everything you need with `use clinigate::prelude::*`
pub mod prelude {
    pub use crate::{
        env_or, env_parse, init_tracing, load_dotenv, load_dotenv_from, Config, ConfigError,
        Environment, Error, GuardSettings, Result,
    };

    pub use clinigate_sanitize::{
        sanitize_structure, sanitize_text, sanitize_text_value, sanitize_value, SanitizeError,
        Sanitized,
    };

    pub use clinigate_guard::{
        Activation, AuthGuard, Decision, DemoModeFlag, FileDemoFlag, GuardConfig,
        InactivityTimer, MemoryDemoFlag, Navigator, Rendered, Session, SessionError,
        SessionSource,
    };

    #[cfg(feature = "http")]
    pub use clinigate_guard::HttpSessionSource;

    pub use serde::{Deserialize, Serialize};
    pub use tracing::{debug, error, info, trace, warn};
}
