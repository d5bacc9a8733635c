//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Poller produces:
//!     → stdout: one status line per successful sample
//!     → logging.rs (structured log events on stderr)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Terminal / log aggregation
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Status lines and logs never share a stream
//! - Metrics are cheap and disabled by default

pub mod logging;
pub mod metrics;
