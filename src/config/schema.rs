//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the poller.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the price poller.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PulseConfig {
    /// Upstream price source.
    pub source: SourceConfig,

    /// Poll cadence and rolling window.
    pub polling: PollingConfig,

    /// Retry delays after failed fetches.
    pub backoff: BackoffConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Upstream price source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Simple-price endpoint URL.
    pub api_url: String,

    /// Asset identifier as known by the API (e.g., "bitcoin").
    pub coin_id: String,

    /// Quote currency code as known by the API (e.g., "usd").
    pub vs_currency: String,

    /// Display symbol for the asset in status lines.
    pub symbol: String,

    /// Display label for the quote currency in status lines.
    pub quote_label: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,

    /// User-Agent header sent upstream.
    pub user_agent: String,

    /// Honor HTTP(S)_PROXY environment variables.
    pub use_env_proxy: bool,
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.coingecko.com/api/v3/simple/price".to_string(),
            coin_id: "bitcoin".to_string(),
            vs_currency: "usd".to_string(),
            symbol: "BTC".to_string(),
            quote_label: "USD".to_string(),
            timeout_secs: 10,
            user_agent: concat!("price-pulse/", env!("CARGO_PKG_VERSION")).to_string(),
            use_env_proxy: true,
        }
    }
}

/// Poll cadence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Delay between successful fetches in milliseconds.
    pub interval_ms: u64,

    /// Number of samples kept for the rolling average.
    pub window_size: usize,
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            window_size: 10,
        }
    }
}

/// Exponential backoff configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Delay after the first failure, in seconds.
    pub base_secs: u64,

    /// Upper bound for the delay, in seconds.
    pub max_secs: u64,

    /// Consecutive failures before failures are reported at error level.
    pub alert_threshold: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_secs: 1,
            max_secs: 60,
            alert_threshold: 5,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9898".to_string(),
        }
    }
}
