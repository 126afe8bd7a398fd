// Logging setup: tracing `fmt` subscriber on stderr.
//
// Level defaults to INFO and can be overridden with `RUST_LOG`
// (e.g. `RUST_LOG=hdrcalib=debug` to trace every brightness step).

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging() -> Result<()> {
    let subscriber = fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!("hdrcalib v{} started", env!("CARGO_PKG_VERSION"));
    Ok(())
}
