//! Exponential backoff for failed fetches.

use std::time::Duration;

use crate::config::BackoffConfig;

/// Tracks consecutive failures and the retry delay derived from them.
///
/// The delay doubles on every consecutive failure, starting at `base` and
/// capped at `max`, and snaps back to `base` on the first success.
#[derive(Debug, Clone)]
pub struct BackoffController {
    base: Duration,
    max: Duration,
    current: Duration,
    consecutive_failures: u32,
    alert_threshold: u32,
}

impl BackoffController {
    pub fn new(base: Duration, max: Duration, alert_threshold: u32) -> Self {
        let max = max.max(base);
        Self {
            base,
            max,
            current: base,
            consecutive_failures: 0,
            alert_threshold,
        }
    }

    pub fn from_config(config: &BackoffConfig) -> Self {
        Self::new(
            Duration::from_secs(config.base_secs),
            Duration::from_secs(config.max_secs),
            config.alert_threshold,
        )
    }

    /// Reset after a successful fetch.
    pub fn on_success(&mut self) {
        self.consecutive_failures = 0;
        self.current = self.base;
    }

    /// Record a failed fetch and return how long to wait before retrying.
    pub fn on_failure(&mut self) -> Duration {
        self.current = if self.consecutive_failures == 0 {
            self.base
        } else {
            self.current.saturating_mul(2).min(self.max)
        };
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.current
    }

    /// True while the failure streak is at or past the alert threshold.
    pub fn should_warn_excessive_failures(&self) -> bool {
        self.consecutive_failures >= self.alert_threshold
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Delay most recently handed out (or `base` after a reset).
    pub fn current_delay(&self) -> Duration {
        self.current
    }
}

impl Default for BackoffController {
    fn default() -> Self {
        Self::from_config(&BackoffConfig::default())
    }
}
