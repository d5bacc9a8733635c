//! End-to-end scenarios for the polling loop, driven by scripted fetchers.

use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::time::Instant;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

use price_pulse::lifecycle::Shutdown;
use price_pulse::polling::{PollSummary, Poller, StatusFormat};
use price_pulse::resilience::backoff::BackoffController;
use price_pulse::sampling::RollingWindow;

mod common;
use common::{CapturedEvents, ScriptedFetcher, SharedBuffer};

fn build_poller(
    script: Vec<Option<f64>>,
    backoff: BackoffController,
) -> (Poller<ScriptedFetcher>, Shutdown, SharedBuffer, std::sync::Arc<std::sync::atomic::AtomicUsize>) {
    let shutdown = Shutdown::new();
    let (fetcher, calls) = ScriptedFetcher::new(script, shutdown.clone());
    let out = SharedBuffer::default();
    let poller = Poller::new(
        fetcher,
        RollingWindow::new(10),
        backoff,
        Duration::from_secs(1),
        StatusFormat::new("BTC", "USD", 10),
        shutdown.clone(),
    )
    .with_output(Box::new(out.clone()));
    (poller, shutdown, out, calls)
}

#[tokio::test(start_paused = true)]
async fn test_success_failure_recovery_scenario() {
    let script = vec![Some(100.0), Some(200.0), Some(300.0), None, Some(400.0)];
    let (mut poller, _shutdown, out, calls) = build_poller(script, BackoffController::default());

    let start = Instant::now();
    let summary = poller.run().await;
    let elapsed = start.elapsed();

    assert_eq!(
        out.lines(),
        vec![
            "[2024-01-01T00:00:00] BTC -> USD: $100.00 | SMA(10): $100.00",
            "[2024-01-01T00:00:01] BTC -> USD: $200.00 | SMA(10): $150.00",
            "[2024-01-01T00:00:02] BTC -> USD: $300.00 | SMA(10): $200.00",
            "[2024-01-01T00:00:04] BTC -> USD: $400.00 | SMA(10): $250.00",
        ]
    );
    assert_eq!(
        summary,
        PollSummary { attempts: 5, successes: 4, failures: 1 }
    );
    assert_eq!(calls.load(Ordering::SeqCst), 5);

    // Three 1s poll intervals plus one 1s backoff; the final wait is cut short.
    assert!(elapsed >= Duration::from_secs(4), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_millis(4500), "elapsed {elapsed:?}");

    assert_eq!(poller.backoff().consecutive_failures(), 0);
    assert_eq!(poller.backoff().current_delay(), Duration::from_secs(1));
    assert_eq!(poller.window().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_before_first_fetch() {
    let (mut poller, shutdown, out, calls) =
        build_poller(vec![Some(1.0)], BackoffController::default());

    shutdown.trigger();
    let summary = poller.run().await;

    assert_eq!(summary, PollSummary::default());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(out.lines().is_empty());
    assert!(poller.window().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_backoff_delays_between_attempts() {
    let mut script = vec![None; 7];
    script.push(Some(50_000.0));
    let (mut poller, _shutdown, out, _calls) = build_poller(script, BackoffController::default());

    let start = Instant::now();
    let summary = poller.run().await;
    let elapsed = start.elapsed();

    // 1 + 2 + 4 + 8 + 16 + 32 + 60 seconds of backoff before the success.
    assert!(elapsed >= Duration::from_secs(123), "elapsed {elapsed:?}");
    assert!(elapsed < Duration::from_secs(124), "elapsed {elapsed:?}");

    assert_eq!(summary.failures, 7);
    assert_eq!(summary.successes, 1);
    assert_eq!(out.lines().len(), 1);
    assert!(out.lines()[0].ends_with("$50,000.00 | SMA(10): $50,000.00"));
    assert_eq!(poller.backoff().current_delay(), Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_error_report_starts_at_fifth_consecutive_failure() {
    let capture = CapturedEvents::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(capture.clone()));

    let mut script = vec![None; 7];
    script.push(Some(1.0));
    let (mut poller, _shutdown, _out, _calls) = build_poller(script, BackoffController::default());
    poller.run().await;

    // Every failure logs a warning; failures 5, 6 and 7 also log an error.
    assert_eq!(capture.at(Level::WARN).len(), 7);
    assert_eq!(
        capture.at(Level::ERROR),
        vec![
            "5 consecutive failures, continuing to poll",
            "6 consecutive failures, continuing to poll",
            "7 consecutive failures, continuing to poll",
        ]
    );

    let retries = capture.at(Level::INFO);
    assert_eq!(retries.iter().filter(|m| *m == "Retrying after backoff").count(), 7);

    // No error precedes the fifth failure warning.
    let events = capture.events();
    let fifth_warn = events
        .iter()
        .enumerate()
        .filter(|(_, (l, _))| *l == Level::WARN)
        .nth(4)
        .map(|(i, _)| i)
        .unwrap();
    let first_error = events.iter().position(|(l, _)| *l == Level::ERROR).unwrap();
    assert!(first_error > fifth_warn);
}

#[tokio::test(start_paused = true)]
async fn test_failures_never_stop_the_loop() {
    let mut script = vec![None; 20];
    script.push(Some(1.0));
    let (mut poller, _shutdown, out, calls) = build_poller(script, BackoffController::default());

    let summary = poller.run().await;

    assert_eq!(calls.load(Ordering::SeqCst), 21);
    assert_eq!(summary.failures, 20);
    assert_eq!(summary.successes, 1);
    assert_eq!(out.lines().len(), 1);
    assert!(!poller.backoff().should_warn_excessive_failures());
}

#[tokio::test(start_paused = true)]
async fn test_window_keeps_last_ten() {
    let script: Vec<Option<f64>> = (1..=11).map(|v| Some(v as f64 * 10.0)).collect();
    let (mut poller, _shutdown, out, _calls) = build_poller(script, BackoffController::default());

    poller.run().await;

    let lines = out.lines();
    assert_eq!(lines.len(), 11);
    // Mean of 20..=110 once the first sample is evicted.
    assert!(lines[10].ends_with("$110.00 | SMA(10): $65.00"), "{}", lines[10]);
    assert_eq!(poller.window().len(), 10);
    assert!(poller.window().iter().all(|s| s.value != 10.0));
}

#[tokio::test]
async fn test_shutdown_interrupts_backoff_wait() {
    // Two scripted failures so the fetcher itself never requests shutdown.
    let backoff = BackoffController::new(Duration::from_secs(30), Duration::from_secs(60), 5);
    let (poller, shutdown, _out, calls) = build_poller(vec![None, None], backoff);

    let handle = tokio::spawn(async move {
        let mut poller = poller;
        poller.run().await
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let triggered_at = std::time::Instant::now();
    shutdown.trigger();

    let summary = tokio::time::timeout(Duration::from_millis(500), handle)
        .await
        .expect("poller did not stop during backoff")
        .unwrap();

    assert!(triggered_at.elapsed() < Duration::from_millis(200));
    assert_eq!(summary.attempts, 1);
    assert_eq!(summary.failures, 1);
}
