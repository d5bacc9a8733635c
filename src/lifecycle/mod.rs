//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Validated config → Metrics (optional) → Fetcher → Poller
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     Flag set → current wait ends → loop exits before next fetch → Exit 0
//! ```
//!
//! # Design Decisions
//! - The shutdown flag is an explicit handle, not global state
//! - Cooperative: checked before each fetch and raced by every wait
//! - In-flight fetches finish or time out on their own

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, WaitOutcome};
