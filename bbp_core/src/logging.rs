//! Tracing setup helpers for binaries and tests embedding the pool.
//!
//! The pool itself only emits `trace!` events on its hot paths; these
//! helpers wire up a subscriber so those events are visible.

/// Initialize logging for development (human-readable format)
pub fn init_dev_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_target(false)
        .with_thread_ids(true)
        .init();
}

/// Initialize logging for production (JSON format)
pub fn init_prod_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(true)
        .with_thread_ids(true)
        .json()
        .init();
}

/// Initialize logging with custom filter, e.g. `"bbp_core=trace"` to see
/// per-acquire pool hit/miss events.
pub fn init_logging_with_filter(filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .with_target(true)
        .with_thread_ids(true)
        .init();
}
