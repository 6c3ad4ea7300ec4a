//! Configuration management with environment variable support.
//!
//! Settings come from the process environment, optionally seeded from a
//! `.env` file, and are deserialized into typed structs with `envy`.
//!
//! # Example
//!
//! ```ignore
//! use clinigate::config::{load_dotenv, GuardSettings};
//!
//! load_dotenv();
//! // CLINIGATE_LOGIN_PATH=/login
//! // CLINIGATE_SESSION_ENDPOINT=https://auth.example.org/session
//! let settings = GuardSettings::from_env()?;
//! let guard = settings.build_guard(router)?;
//! ```

use clinigate_guard::{
    AuthGuard, FileDemoFlag, GuardConfig, MemoryDemoFlag, Navigator, DEFAULT_LOGIN_PATH,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Prefix for every clinigate environment variable.
pub const ENV_PREFIX: &str = "CLINIGATE";

/// Error type for configuration loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable deserialization failed.
    #[error("Configuration error: {0}")]
    Envy(#[from] envy::Error),

    /// A setting has a value that cannot be used.
    #[error("Invalid setting {name}: {reason}")]
    Invalid {
        /// Setting name.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

/// Environment profile for the application.
///
/// Detected from the `CLINIGATE_ENV` environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Development environment with verbose, pretty logging.
    Development,
    /// Production environment with compact logging.
    Production,
    /// Custom environment name for specialized deployments.
    Custom(String),
}

impl Environment {
    /// Detect the current environment from `CLINIGATE_ENV`.
    ///
    /// - `production` or `prod` → `Production`
    /// - `development`, `dev` or unset → `Development`
    /// - anything else → `Custom(name)`
    pub fn current() -> Self {
        match std::env::var("CLINIGATE_ENV").as_deref() {
            Ok("production") | Ok("prod") => Self::Production,
            Ok("development") | Ok("dev") => Self::Development,
            Ok(other) => Self::Custom(other.to_string()),
            Err(_) => Self::Development,
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Get the environment name as a string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Custom(name) => name,
        }
    }

    /// Default log filter for this environment.
    ///
    /// Development logs the guard's per-activation transitions; everything
    /// else stays at `info`.
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Self::Development => "debug",
            Self::Production | Self::Custom(_) => "info",
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed configuration deserialized from environment variables.
///
/// Field names map to SCREAMING_SNAKE_CASE variables.
#[derive(Debug, Clone)]
pub struct Config<T>(pub T);

impl<T: DeserializeOwned> Config<T> {
    /// Load configuration from unprefixed environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config(envy::from_env::<T>()?))
    }

    /// Load configuration from variables named `{prefix}_{FIELD}`.
    pub fn from_env_prefixed(prefix: &str) -> Result<Self, ConfigError> {
        Ok(Config(envy::prefixed(format!("{}_", prefix)).from_env::<T>()?))
    }

    /// Get the inner configuration value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for Config<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Load environment variables from a `.env` file in the current directory.
///
/// A missing file is not an error and existing variables are not overridden.
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Load environment variables from a specific file path.
pub fn load_dotenv_from<P: AsRef<std::path::Path>>(path: P) {
    let _ = dotenvy::from_path(path);
}

/// Get an environment variable with a default value.
pub fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

/// Get an environment variable and parse it to a specific type.
pub fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

fn default_session_timeout_ms() -> u64 {
    5_000
}

/// Guard wiring read from `CLINIGATE_*` variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GuardSettings {
    /// `CLINIGATE_LOGIN_PATH`, where denied views are redirected.
    #[serde(default = "default_login_path")]
    pub login_path: String,
    /// `CLINIGATE_SESSION_ENDPOINT`, the auth provider's session URL.
    #[serde(default)]
    pub session_endpoint: Option<String>,
    /// `CLINIGATE_SESSION_TIMEOUT_MS`, per-lookup timeout.
    #[serde(default = "default_session_timeout_ms")]
    pub session_timeout_ms: u64,
    /// `CLINIGATE_DEMO_FLAG_DIR`, directory holding the persisted demo flag.
    #[serde(default)]
    pub demo_flag_dir: Option<PathBuf>,
}

impl Default for GuardSettings {
    fn default() -> Self {
        Self {
            login_path: default_login_path(),
            session_endpoint: None,
            session_timeout_ms: default_session_timeout_ms(),
            demo_flag_dir: None,
        }
    }
}

impl GuardSettings {
    /// Load settings from `CLINIGATE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let settings = Config::<Self>::from_env_prefixed(ENV_PREFIX)?.into_inner();
        settings.validate()?;
        Ok(settings)
    }

    /// Reject settings the guard cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.login_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                name: "login_path",
                reason: format!("must be an absolute path, got {:?}", self.login_path),
            });
        }
        if self.session_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                name: "session_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Guard configuration derived from these settings.
    pub fn guard_config(&self) -> GuardConfig {
        GuardConfig::new().login_path(self.login_path.clone())
    }

    /// Build an [`AuthGuard`] from these settings.
    ///
    /// The demo flag is file-backed when `demo_flag_dir` is set and otherwise
    /// an in-memory flag that starts disabled. Without a session endpoint the
    /// guard has no session source and denies every non-demo activation.
    pub fn build_guard<N: Navigator + 'static>(&self, navigator: N) -> Result<AuthGuard, ConfigError> {
        self.validate()?;

        let mut builder = AuthGuard::builder()
            .navigator(navigator)
            .config(self.guard_config());

        builder = match &self.demo_flag_dir {
            Some(dir) => builder.demo_flag(FileDemoFlag::new(dir)),
            None => builder.demo_flag(MemoryDemoFlag::new()),
        };

        if let Some(endpoint) = &self.session_endpoint {
            builder = self.attach_session_source(builder, endpoint)?;
        } else {
            tracing::warn!("no session endpoint configured; only demo mode can authorize");
        }

        Ok(builder.build())
    }

    #[cfg(feature = "http")]
    fn attach_session_source(
        &self,
        builder: clinigate_guard::AuthGuardBuilder,
        endpoint: &str,
    ) -> Result<clinigate_guard::AuthGuardBuilder, ConfigError> {
        let timeout = std::time::Duration::from_millis(self.session_timeout_ms);
        let source = clinigate_guard::HttpSessionSource::with_timeout(endpoint, timeout).map_err(
            |e| ConfigError::Invalid {
                name: "session_endpoint",
                reason: e.to_string(),
            },
        )?;
        Ok(builder.session_source(source))
    }

    #[cfg(not(feature = "http"))]
    fn attach_session_source(
        &self,
        _builder: clinigate_guard::AuthGuardBuilder,
        _endpoint: &str,
    ) -> Result<clinigate_guard::AuthGuardBuilder, ConfigError> {
        Err(ConfigError::Invalid {
            name: "session_endpoint",
            reason: "requires the `http` feature".to_string(),
        })
    }
}
