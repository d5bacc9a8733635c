//! Polling subsystem.
//!
//! # Data Flow
//! ```text
//! poller.rs
//!     → SampleFetcher::fetch
//!     → ok:  RollingWindow::record → BackoffController::on_success → status.rs line → wait(interval)
//!     → err: BackoffController::on_failure → warn/error log → wait(delay)
//!     → every wait races the shutdown flag
//! ```
//!
//! # Design Decisions
//! - Single task owns window and backoff state; no locking
//! - Failures are absorbed here and never propagate past the loop
//! - The only exit is a shutdown request

pub mod poller;
pub mod status;

pub use poller::{PollState, PollSummary, Poller};
pub use status::StatusFormat;
