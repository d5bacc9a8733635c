//! Resilient Price Poller Library

pub mod cli;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod polling;
pub mod resilience;
pub mod sampling;

pub use config::schema::PulseConfig;
pub use lifecycle::Shutdown;
pub use polling::Poller;
