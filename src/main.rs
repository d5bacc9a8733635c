//! Price Pulse
//!
//! Polls a live asset price at a fixed cadence, prints each sample with a
//! rolling average, backs off on upstream failures, and exits cleanly on
//! SIGINT/SIGTERM.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                         PRICE PULSE                          │
//!   │                                                              │
//!   │  ┌──────────┐   ┌──────────────┐   ┌──────────────────┐      │
//!   │  │ sampling │──▶│   polling    │──▶│ stdout: status   │      │
//!   │  │ fetcher  │   │   poller     │   │ lines            │      │
//!   │  └──────────┘   └──────┬───────┘   └──────────────────┘      │
//!   │                        │                                     │
//!   │          ┌─────────────┼──────────────┐                      │
//!   │          ▼             ▼              ▼                      │
//!   │   ┌────────────┐ ┌────────────┐ ┌────────────┐               │
//!   │   │  rolling   │ │ resilience │ │ lifecycle  │◀── SIGINT     │
//!   │   │  window    │ │  backoff   │ │  shutdown  │    SIGTERM    │
//!   │   └────────────┘ └────────────┘ └────────────┘               │
//!   │                                                              │
//!   │   config (TOML + CLI)   observability (tracing, metrics)     │
//!   └──────────────────────────────────────────────────────────────┘
//! ```

use clap::Parser;

use price_pulse::cli::{Cli, Commands};
use price_pulse::lifecycle::startup;
use price_pulse::observability::logging::init_logging;
use price_pulse::sampling::HttpFetcher;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    init_logging(&config.observability)?;

    match cli.command() {
        Commands::CheckConfig => {
            println!("{}", toml::to_string_pretty(&config)?);
        }
        Commands::Once => {
            let fetcher = HttpFetcher::new(&config.source)?;
            println!("{}", startup::fetch_once(&fetcher, &config).await?);
        }
        Commands::Run => {
            tracing::info!("price-pulse v{} starting", env!("CARGO_PKG_VERSION"));
            startup::run(config).await?;
        }
    }

    Ok(())
}
