//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, window >= 1, max >= base)
//! - Check the upstream URL and metrics address parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PulseConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::PulseConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("source.api_url '{url}' is invalid: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("backoff.max_secs ({max}) must be >= backoff.base_secs ({base})")]
    BackoffRange { base: u64, max: u64 },

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),

    #[error("observability.log_level '{0}' is not a level (trace, debug, info, warn, error, off) or a filter directive")]
    LogLevel(String),
}

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Bare words must be level names, since `EnvFilter` reads any other word as a
/// target. Directive lists (containing `=` or `,`) must parse as a filter.
fn is_valid_log_level(level: &str) -> bool {
    let level = level.trim();
    if level.contains('=') || level.contains(',') {
        return tracing_subscriber::EnvFilter::try_new(level).is_ok();
    }
    LOG_LEVELS.iter().any(|l| l.eq_ignore_ascii_case(level))
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &PulseConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match url::Url::parse(&config.source.api_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::InvalidUrl {
            url: config.source.api_url.clone(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::InvalidUrl {
            url: config.source.api_url.clone(),
            reason: e.to_string(),
        }),
    }

    if config.source.coin_id.trim().is_empty() {
        errors.push(ValidationError::Empty("source.coin_id"));
    }
    if config.source.vs_currency.trim().is_empty() {
        errors.push(ValidationError::Empty("source.vs_currency"));
    }
    if config.source.timeout_secs == 0 {
        errors.push(ValidationError::Zero("source.timeout_secs"));
    }

    if config.polling.interval_ms == 0 {
        errors.push(ValidationError::Zero("polling.interval_ms"));
    }
    if config.polling.window_size == 0 {
        errors.push(ValidationError::Zero("polling.window_size"));
    }

    if config.backoff.base_secs == 0 {
        errors.push(ValidationError::Zero("backoff.base_secs"));
    }
    if config.backoff.max_secs < config.backoff.base_secs {
        errors.push(ValidationError::BackoffRange {
            base: config.backoff.base_secs,
            max: config.backoff.max_secs,
        });
    }
    if config.backoff.alert_threshold == 0 {
        errors.push(ValidationError::Zero("backoff.alert_threshold"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if !is_valid_log_level(&config.observability.log_level) {
        errors.push(ValidationError::LogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
