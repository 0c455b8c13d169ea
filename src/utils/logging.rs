// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global tracing subscriber, filtered by `RUST_LOG` (falling
/// back to `info`). Writes to stderr; stdout carries extraction output.
pub fn setup_logging() {
    // An unset or malformed RUST_LOG both land on info.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Logging setup complete.");
}
