use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::errors::CoreError;

/// How the host app wants log output configured.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `apex_wealth_core=debug`
    pub log_level: String,
    /// Emit ANSI colours (off for log files and most mobile consoles)
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            ansi: true,
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            ansi: std::env::var("NO_COLOR").is_err(),
        }
    }
}

/// Install a global `tracing` subscriber writing formatted lines to stdout.
///
/// Fails if the filter directive does not parse or a global subscriber is
/// already installed (e.g. by the host app).
pub fn init_logging(config: &LoggingConfig) -> Result<(), CoreError> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.log_level).map_err(|e| {
        CoreError::ValidationError(format!("Invalid log filter {:?}: {e}", config.log_level))
    })?;

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_ansi(config.ansi))
        .try_init()
        .map_err(|e| CoreError::ValidationError(format!("Logging already initialised: {e}")))?;

    tracing::info!("Logging initialised at level {}", config.log_level);
    Ok(())
}
