//! Logging setup
//!
//! Library code only emits `tracing` events under the `covenant::*`
//! targets. Hosts that have no subscriber of their own can install the
//! default one here.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `filter` (RUST_LOG syntax)
///
/// An invalid directive falls back to `info`. Returns `false` if a global
/// subscriber was already installed; calling this more than once is safe.
pub fn init_tracing(filter: &str) -> bool {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
