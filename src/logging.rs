//! Logging setup for the binary.
//!
//! Installs a global tracing subscriber writing to stderr so that stdout stays
//! clean for the dashboard and `--json` output. `RUST_LOG` overrides the
//! verbosity-derived filter.

use crate::cli::Verbosity;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Errors that may occur while initializing logging.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Failed to set the global tracing subscriber.
    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize tracing to stderr.
pub fn init(verbosity: Verbosity) -> Result<(), LoggingError> {
    let subscriber = Registry::default()
        .with(build_env_filter(verbosity))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr));
    tracing::subscriber::set_global_default(subscriber)?;
    tracing::debug!("Logging initialized at {}", verbosity.as_str());
    Ok(())
}

fn build_env_filter(verbosity: Verbosity) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)))
}

fn default_directive(verbosity: Verbosity) -> String {
    format!("vqesim={}", verbosity.log_filter())
}
