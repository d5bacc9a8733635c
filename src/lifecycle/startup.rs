//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize optional subsystems (metrics endpoint)
//! - Build the fetcher and poller from validated configuration
//! - Wire the signal listener to the shutdown flag and run the loop
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, before the first fetch
//! - Once the loop is running, only a shutdown request ends it

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::PulseConfig;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals;
use crate::observability::metrics;
use crate::polling::{PollSummary, Poller, StatusFormat};
use crate::sampling::{FetchError, HttpFetcher, SampleFetcher};

/// Errors that prevent the poller from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
}

/// Start the poller and block until a termination signal stops it.
pub async fn run(config: PulseConfig) -> Result<PollSummary, StartupError> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let fetcher = HttpFetcher::new(&config.source)?;
    tracing::info!(
        api_url = %config.source.api_url,
        coin = %config.source.coin_id,
        currency = %config.source.vs_currency,
        "Price source configured"
    );

    let shutdown = Shutdown::new();
    let listener = signals::listen(shutdown.clone());

    let mut poller = Poller::from_config(fetcher, &config, shutdown.clone());
    let summary = poller.run().await;

    shutdown.trigger();
    if let Err(e) = listener.await {
        tracing::warn!(error = %e, "Signal listener task failed");
    }

    tracing::info!("Shutdown complete");
    Ok(summary)
}

/// Fetch once and render a status line (no window history, so SMA = value).
pub async fn fetch_once<F: SampleFetcher>(fetcher: &F, config: &PulseConfig) -> Result<String, StartupError> {
    let sample = fetcher.fetch().await?;
    let format = StatusFormat::from_config(&config.source, 1);
    Ok(format.render(&sample, sample.value))
}
