//! Logging infrastructure for PillPet.
//!
//! The core only emits `tracing` events; subscriber setup lives here so
//! every host application embedding the crate configures it the same way.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging with sensible defaults.
///
/// Default level is INFO; the RUST_LOG environment variable overrides it.
/// Panics if a global subscriber is already installed; hosts that may
/// have set one up should use [`try_init`].
pub fn init() {
    init_with_level("info")
}

/// Initialize logging with a specific default level
/// (debug, info, warn, error). RUST_LOG still takes precedence.
pub fn init_with_level(default_level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(fmt::layer().compact())
        .init();
}

/// Like [`init`], but a no-op when a subscriber is already installed.
/// Mobile hosts often wire their own logger before loading the core.
pub fn try_init() {
    let _ = tracing_subscriber::registry()
        .with(env_filter("info"))
        .with(fmt::layer().compact())
        .try_init();
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}
