//! Tracing subscriber setup for the binaries.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber on stderr, filtered by `RUST_LOG` (default `info`).
///
/// Stdout is reserved for the JSON output.
pub fn init_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
}
