//! Tracing setup.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "ARCHCOV_LOG";

static INIT: Once = Once::new();

/// Initialize the global tracing subscriber.
///
/// Respects `ARCHCOV_LOG`; defaults to `info` when unset or invalid.
///
/// Idempotent: only the first call of this or [`init_tracing_with_filter`]
/// installs a subscriber.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
        install(filter);
    });
}

/// Initialize tracing with an explicit filter string, ignoring `ARCHCOV_LOG`.
///
/// Idempotent, like [`init_tracing`].
pub fn init_tracing_with_filter(filter: &str) {
    INIT.call_once(|| install(EnvFilter::new(filter)));
}

fn install(filter: EnvFilter) {
    // Another subscriber installed outside this module wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
