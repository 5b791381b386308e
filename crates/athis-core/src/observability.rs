//! Logging setup (tracing-subscriber).

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};
use crate::domain::{AthisError, Result};

/// Installs the global subscriber. `RUST_LOG` wins over the configured level;
/// `verbose` forces debug. Logs go to stderr so stdout stays machine-readable.
pub fn init_logging(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { config.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("athis_core={level},athis_cli={level},warn")))
        .map_err(|e| AthisError::configuration(format!("log filter: {e}")))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .json(),
            )
            .try_init(),
    };
    result.map_err(|e| AthisError::configuration(format!("logger already installed: {e}")))
}
