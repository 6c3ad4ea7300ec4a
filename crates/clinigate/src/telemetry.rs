//! Tracing subscriber setup.

use crate::config::Environment;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a global `tracing` subscriber for `env`.
///
/// `RUST_LOG` wins when set; otherwise the environment's default level
/// applies to the clinigate crates. Production logs compact single lines,
/// everything else logs pretty multi-line events.
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(env: &Environment) -> crate::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(env)));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if env.is_production() {
        registry.with(fmt::layer().compact()).try_init()
    } else {
        registry.with(fmt::layer().pretty()).try_init()
    };

    installed.map_err(|e| crate::Error::Telemetry(e.to_string()))
}

fn default_directives(env: &Environment) -> String {
    let level = env.default_log_level();
    format!("info,clinigate={level},clinigate_guard={level},clinigate_sanitize={level}")
}
