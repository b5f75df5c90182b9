// Logging module for structured logging using the tracing crate

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::config::{LogFormat, LoggingConfig};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{directive}': {message}")]
    InvalidFilter { directive: String, message: String },

    #[error("Failed to install subscriber: {0}")]
    InitFailed(String),
}

/// Initialize the tracing subscriber for structured logging
///
/// `RUST_LOG` takes precedence over `config.level` when set. Output goes to
/// stdout, one JSON object per event unless `config.format` is `pretty`.
///
/// # Errors
///
/// Returns an error if the filter directive does not parse or a global
/// subscriber is already installed.
///
/// # Examples
///
/// ```
/// use brewcache::config::LoggingConfig;
/// use brewcache::logging::init_subscriber;
///
/// init_subscriber(&LoggingConfig::default()).expect("Failed to initialize logging");
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = build_filter(config)?;

    match config.format {
        LogFormat::Json => Registry::default()
            .with(filter)
            .with(fmt::layer().json().with_current_span(false))
            .try_init(),
        LogFormat::Pretty => Registry::default()
            .with(filter)
            .with(fmt::layer().pretty())
            .try_init(),
    }
    .map_err(|e| LoggingError::InitFailed(e.to_string()))
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level).map_err(|e| LoggingError::InvalidFilter {
        directive: config.level.clone(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter_accepts_module_directives() {
        let config = LoggingConfig {
            level: "info,brewcache::cache=debug".to_string(),
            format: LogFormat::Json,
        };
        assert!(build_filter(&config).is_ok());
    }

    #[test]
    fn test_second_init_reports_error_instead_of_panicking() {
        let config = LoggingConfig::default();
        let _ = init_subscriber(&config);
        assert!(matches!(
            init_subscriber(&config),
            Err(LoggingError::InitFailed(_))
        ));
    }
}
