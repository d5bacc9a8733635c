//! Command-line interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::loader::{load_layered, ConfigError};
use crate::config::{LogFormat, PulseConfig};

#[derive(Parser, Debug)]
#[command(name = "price-pulse")]
#[command(about = "Poll a live asset price and print its rolling average", long_about = None)]
pub struct Cli {
    /// TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Asset id as known by the API (e.g. bitcoin)
    #[arg(long)]
    pub coin: Option<String>,

    /// Quote currency code (e.g. usd)
    #[arg(long)]
    pub currency: Option<String>,

    /// Display symbol for the asset (e.g. BTC)
    #[arg(long)]
    pub symbol: Option<String>,

    /// Delay between successful polls in milliseconds
    #[arg(long)]
    pub interval_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error, off) or a filter directive
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Poll until interrupted (default)
    Run,
    /// Fetch once, print one status line, and exit
    Once,
    /// Validate configuration and print the effective settings
    CheckConfig,
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Run)
    }

    /// Load the config file (or defaults), apply flags, and validate the result.
    pub fn resolve_config(&self) -> Result<PulseConfig, ConfigError> {
        load_layered(self.config.as_deref(), |config| self.apply_overrides(config))
    }

    pub fn apply_overrides(&self, config: &mut PulseConfig) {
        if let Some(coin) = &self.coin {
            config.source.coin_id = coin.clone();
        }
        if let Some(currency) = &self.currency {
            config.source.vs_currency = currency.to_lowercase();
            config.source.quote_label = currency.to_uppercase();
        }
        if let Some(symbol) = &self.symbol {
            config.source.symbol = symbol.clone();
        }
        if let Some(interval_ms) = self.interval_ms {
            config.polling.interval_ms = interval_ms;
        }
        if let Some(level) = &self.log_level {
            config.observability.log_level = level.clone();
        }
        if self.json_logs {
            config.observability.log_format = LogFormat::Json;
        }
    }
}
