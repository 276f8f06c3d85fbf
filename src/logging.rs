//! Diagnostic logging
//!
//! Installs a `tracing` fmt subscriber writing to stderr. `RUST_LOG` wins
//! when set; otherwise budgetcap logs warnings, or everything down to debug
//! with `--verbose`.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static INIT_TRACING: Once = Once::new();

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    INIT_TRACING.call_once(|| {
        let default_directive = if verbose {
            "budgetcap=debug"
        } else {
            "budgetcap=warn"
        };

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive));

        // Another subscriber may already be installed (e.g. by a test harness)
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();

        tracing::debug!("budgetcap tracing initialized");
    });
}
