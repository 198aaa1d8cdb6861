//! Structured logging setup for the binary. Library code only emits `tracing` events.

use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` wins over `level` when set. Output goes to stderr so stdout stays
/// parseable JSON.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
