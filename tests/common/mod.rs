//! Shared utilities for integration testing.

use std::collections::VecDeque;
use std::future::Future;
use std::io::Write;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

use price_pulse::lifecycle::Shutdown;
use price_pulse::sampling::{FetchError, FetchResult, Sample, SampleFetcher};

/// Start a programmable mock price API on an ephemeral port.
///
/// The handler returns `(status, body)`; it may sleep to simulate a slow upstream.
#[allow(dead_code)]
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        // Drain the request head before answering.
                        let mut buf = [0u8; 2048];
                        let _ = socket.read(&mut buf).await;

                        let (status, body) = f().await;
                        let status_text = match status {
                            200 => "200 OK",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Scripted fetcher: replays `script` in order and requests shutdown once the
/// last entry has been handed out. `None` entries are failures.
#[allow(dead_code)]
pub struct ScriptedFetcher {
    script: Mutex<VecDeque<Option<f64>>>,
    calls: Arc<AtomicUsize>,
    shutdown: Shutdown,
}

#[allow(dead_code)]
impl ScriptedFetcher {
    pub fn new(script: Vec<Option<f64>>, shutdown: Shutdown) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                script: Mutex::new(script.into()),
                calls: calls.clone(),
                shutdown,
            },
            calls,
        )
    }
}

#[async_trait]
impl SampleFetcher for ScriptedFetcher {
    async fn fetch(&self) -> FetchResult<Sample> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let (next, exhausted) = {
            let mut script = self.script.lock().unwrap();
            let next = script.pop_front();
            (next, script.is_empty())
        };
        if exhausted {
            self.shutdown.trigger();
        }

        match next {
            Some(Some(value)) => Ok(Sample::new(
                value,
                Utc.timestamp_opt(1_704_067_200 + n as i64, 0).unwrap(),
            )),
            Some(None) => Err(FetchError::Network("connection refused".into())),
            None => Err(FetchError::Network("script exhausted".into())),
        }
    }
}

/// `Write` sink shared with the test so emitted status lines can be inspected.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl SharedBuffer {
    pub fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Layer that records the level and message of every event it sees.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct CapturedEvents(Arc<Mutex<Vec<(Level, String)>>>);

#[allow(dead_code)]
impl CapturedEvents {
    pub fn events(&self) -> Vec<(Level, String)> {
        self.0.lock().unwrap().clone()
    }

    pub fn at(&self, level: Level) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }
}

#[allow(dead_code)]
#[derive(Default)]
struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

impl<S: Subscriber> Layer<S> for CapturedEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.0
            .lock()
            .unwrap()
            .push((*event.metadata().level(), visitor.0));
    }
}
