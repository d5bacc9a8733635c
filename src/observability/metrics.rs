//! Metrics collection and exposition.
//!
//! # Metrics
//! - `price_pulse_fetch_total` (counter): fetch attempts by outcome
//! - `price_pulse_fetch_duration_seconds` (histogram): fetch latency
//! - `price_pulse_last_value` (gauge): most recent sample
//! - `price_pulse_rolling_average` (gauge): current window mean
//! - `price_pulse_consecutive_failures` (gauge): current failure streak
//! - `price_pulse_backoff_seconds` (gauge): delay before the next retry
//!
//! Recording without an installed exporter is a no-op.

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use crate::sampling::types::FetchErrorKind;

/// Install the Prometheus exporter with an HTTP scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), metrics_exporter_prometheus::BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_success(started: Instant, value: f64, average: f64) {
    counter!("price_pulse_fetch_total", "outcome" => "success").increment(1);
    histogram!("price_pulse_fetch_duration_seconds").record(started.elapsed().as_secs_f64());
    gauge!("price_pulse_last_value").set(value);
    gauge!("price_pulse_rolling_average").set(average);
    gauge!("price_pulse_consecutive_failures").set(0.0);
    gauge!("price_pulse_backoff_seconds").set(0.0);
}

pub fn record_failure(started: Instant, kind: FetchErrorKind, streak: u32, delay: Duration) {
    counter!("price_pulse_fetch_total", "outcome" => kind.to_string()).increment(1);
    histogram!("price_pulse_fetch_duration_seconds").record(started.elapsed().as_secs_f64());
    gauge!("price_pulse_consecutive_failures").set(streak as f64);
    gauge!("price_pulse_backoff_seconds").set(delay.as_secs_f64());
}
