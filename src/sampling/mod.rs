//! Sampling subsystem.
//!
//! # Data Flow
//! ```text
//! fetcher.rs (one bounded HTTP call)
//!     → Sample { value, observed_at }   or   FetchError (Transient | DataShape)
//!     → window.rs (fixed-capacity FIFO, arithmetic mean on demand)
//! ```
//!
//! # Design Decisions
//! - The poller only depends on the `SampleFetcher` trait, never on HTTP
//! - Samples are immutable once created
//! - An empty window has no average (`None`), rather than a precondition

pub mod fetcher;
pub mod types;
pub mod window;

pub use fetcher::{HttpFetcher, SampleFetcher};
pub use types::{FetchError, FetchErrorKind, FetchResult, Sample};
pub use window::RollingWindow;
