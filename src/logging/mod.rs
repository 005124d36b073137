// Logging module for structured logging using the tracing crate

use std::sync::OnceLock;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::{LogFormat, LoggingConfig};

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log filter '{directive}': {reason}")]
    InvalidFilter { directive: String, reason: String },

    #[error("Failed to install subscriber: {0}")]
    Init(String),
}

// Outcome of the one install attempt, shared by every caller
static INSTALLED: OnceLock<Result<(), String>> = OnceLock::new();

/// Build the filter: `RUST_LOG` when set, the configured level otherwise
fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| LoggingError::InvalidFilter {
        directive: config.level.clone(),
        reason: e.to_string(),
    })
}

/// Initialize the tracing subscriber for structured logging.
///
/// JSON output is one object per line on stdout, for log aggregation;
/// `pretty` is meant for running the CLI by hand. Only the first call
/// installs a subscriber; later calls return `Ok(())` without changing it.
///
/// # Errors
///
/// Returns an error if the configured level is not a valid filter directive,
/// or if some other global subscriber was installed first.
///
/// # Examples
///
/// ```
/// use offline_shell::config::LoggingConfig;
/// use offline_shell::logging::init_subscriber;
///
/// init_subscriber(&LoggingConfig::default()).unwrap();
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;

    INSTALLED
        .get_or_init(|| install(filter, config.format))
        .clone()
        .map_err(LoggingError::Init)
}

fn install(filter: EnvFilter, format: LogFormat) -> Result<(), String> {
    let result = match format {
        LogFormat::Json => Registry::default()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Pretty => Registry::default()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init(),
    };
    result.map_err(|e| e.to_string())
}
