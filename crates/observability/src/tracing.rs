//! Subscriber installation.
//!
//! One JSON line per event, suitable for piping into whatever collects the
//! service's stdout. Verbosity comes from `RUST_LOG`; without it the
//! service logs at `info`, which covers request-capture failures and
//! first-sight user creation.

use tracing_subscriber::EnvFilter;

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // try_init so a second caller (tests) does not panic on the global
    // default already being set.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_target(false)
        .try_init();
}
