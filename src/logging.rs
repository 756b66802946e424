//! Tracing subscriber setup.
//!
//! `local` logs human-readable lines at debug, `dev` logs JSON at debug, and
//! `prod` logs JSON at info. `RUST_LOG` overrides the level when set.

use tracing_subscriber::EnvFilter;

use crate::config::Environment;

#[must_use]
pub fn default_directive(env: Environment) -> &'static str {
    match env {
        Environment::Local | Environment::Dev => "debug",
        Environment::Prod => "info",
    }
}

/// Install the global subscriber. Call once at startup.
pub fn init(env: Environment) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(env)));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match env {
        Environment::Local => builder.init(),
        Environment::Dev | Environment::Prod => builder.json().init(),
    }
}
