//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Fetch attempt fails:
//!     → backoff.rs (count the failure, hand out the next delay)
//!     → poller waits that long (interruptible by shutdown)
//! Fetch attempt succeeds:
//!     → backoff.rs (reset streak and delay)
//! ```
//!
//! # Design Decisions
//! - Failures are never fatal; the streak only escalates log level
//! - No jitter: a single poller has no thundering herd to avoid
//! - Per-request deadlines live in the fetcher, not here

pub mod backoff;
