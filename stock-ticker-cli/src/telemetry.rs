//! Diagnostic logging setup.
//!
//! Standard output carries the envelope protocol, so diagnostics go to
//! standard error. Filtering follows `RUST_LOG` and defaults to `warn`.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}
