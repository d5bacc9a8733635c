//! The resilient polling loop.
//!
//! # State Transitions
//! ```text
//! Running      → fetch ok  → record, reset backoff, emit line, wait(interval) → Running
//! Running      → fetch err → count failure → Backoff(delay)
//! Backoff(d)   → wait(d) → Running
//! any          → shutdown requested → ShuttingDown (terminal)
//! ```
//!
//! Shutdown is checked before every fetch and ends every wait early. An
//! in-flight fetch is never aborted; its own deadline bounds it.

use std::io::Write;
use std::time::{Duration, Instant};

use crate::config::PulseConfig;
use crate::lifecycle::shutdown::{Shutdown, WaitOutcome};
use crate::observability::metrics;
use crate::polling::status::StatusFormat;
use crate::resilience::backoff::BackoffController;
use crate::sampling::fetcher::SampleFetcher;
use crate::sampling::window::RollingWindow;

/// Poller states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Running,
    Backoff(Duration),
    ShuttingDown,
}

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    pub attempts: u64,
    pub successes: u64,
    pub failures: u64,
}

/// Drives fetches, the rolling window, and backoff until shutdown.
pub struct Poller<F> {
    fetcher: F,
    window: RollingWindow,
    backoff: BackoffController,
    shutdown: Shutdown,
    interval: Duration,
    format: StatusFormat,
    out: Box<dyn Write + Send>,
    summary: PollSummary,
}

impl<F: SampleFetcher> Poller<F> {
    pub fn new(
        fetcher: F,
        window: RollingWindow,
        backoff: BackoffController,
        interval: Duration,
        format: StatusFormat,
        shutdown: Shutdown,
    ) -> Self {
        Self {
            fetcher,
            window,
            backoff,
            shutdown,
            interval,
            format,
            out: Box::new(std::io::stdout()),
            summary: PollSummary::default(),
        }
    }

    pub fn from_config(fetcher: F, config: &PulseConfig, shutdown: Shutdown) -> Self {
        Self::new(
            fetcher,
            RollingWindow::new(config.polling.window_size),
            BackoffController::from_config(&config.backoff),
            config.polling.interval(),
            StatusFormat::from_config(&config.source, config.polling.window_size),
            shutdown,
        )
    }

    /// Send status lines somewhere other than stdout.
    pub fn with_output(mut self, out: Box<dyn Write + Send>) -> Self {
        self.out = out;
        self
    }

    pub fn window(&self) -> &RollingWindow {
        &self.window
    }

    pub fn backoff(&self) -> &BackoffController {
        &self.backoff
    }

    /// Run until shutdown is requested.
    pub async fn run(&mut self) -> PollSummary {
        tracing::info!(
            interval_ms = self.interval.as_millis() as u64,
            window = self.window.capacity(),
            "Poller starting"
        );

        let mut state = PollState::Running;
        loop {
            state = match state {
                PollState::Running => {
                    if self.shutdown.is_triggered() {
                        PollState::ShuttingDown
                    } else {
                        self.attempt().await
                    }
                }
                PollState::Backoff(delay) => match self.shutdown.sleep(delay).await {
                    WaitOutcome::Elapsed => PollState::Running,
                    WaitOutcome::ShutdownRequested => PollState::ShuttingDown,
                },
                PollState::ShuttingDown => break,
            };
        }

        tracing::info!(
            attempts = self.summary.attempts,
            successes = self.summary.successes,
            failures = self.summary.failures,
            "Poller stopped"
        );
        self.summary
    }

    /// One fetch plus the wait that follows it.
    async fn attempt(&mut self) -> PollState {
        self.summary.attempts += 1;
        let started = Instant::now();

        match self.fetcher.fetch().await {
            Ok(sample) => {
                self.summary.successes += 1;
                self.window.record(sample);
                self.backoff.on_success();

                let average = self.window.average().unwrap_or(sample.value);
                metrics::record_success(started, sample.value, average);
                let line = self.format.render(&sample, average);
                self.emit(&line);

                match self.shutdown.sleep(self.interval).await {
                    WaitOutcome::Elapsed => PollState::Running,
                    WaitOutcome::ShutdownRequested => PollState::ShuttingDown,
                }
            }
            Err(e) => {
                self.summary.failures += 1;
                let kind = e.kind();
                let delay = self.backoff.on_failure();
                let streak = self.backoff.consecutive_failures();
                metrics::record_failure(started, kind, streak, delay);

                tracing::warn!(error = %e, kind = %kind, consecutive_failures = streak, "Fetch failed");
                tracing::info!(delay_secs = delay.as_secs(), "Retrying after backoff");
                if self.backoff.should_warn_excessive_failures() {
                    tracing::error!(
                        consecutive_failures = streak,
                        "{} consecutive failures, continuing to poll",
                        streak
                    );
                }

                PollState::Backoff(delay)
            }
        }
    }

    fn emit(&mut self, line: &str) {
        let result = writeln!(self.out, "{}", line).and_then(|_| self.out.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to write status line");
        }
    }
}
