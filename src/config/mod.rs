//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → CLI overrides applied on top
//!     → validation.rs (semantic checks)
//!     → PulseConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no hot reload
//! - All fields have defaults so the poller runs with no file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::PulseConfig;
pub use schema::SourceConfig;
pub use schema::PollingConfig;
pub use schema::BackoffConfig;
pub use schema::ObservabilityConfig;
pub use schema::LogFormat;
