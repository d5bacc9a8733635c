//! Configuration loading.
//!
//! Layers, lowest precedence first: built-in defaults, the TOML file (if
//! any), then caller overrides. Validation runs once on the merged result.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::schema::PulseConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Why a configuration could not be produced.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Read and deserialize a TOML file without validating it.
pub fn read_file(path: &Path) -> Result<PulseConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Build the effective configuration: defaults, then `path`, then `overrides`.
pub fn load_layered<O>(path: Option<&Path>, overrides: O) -> Result<PulseConfig, ConfigError>
where
    O: FnOnce(&mut PulseConfig),
{
    let mut config = match path {
        Some(path) => {
            let config = read_file(path)?;
            tracing::debug!(path = %path.display(), "Loaded config file");
            config
        }
        None => PulseConfig::default(),
    };
    overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate a TOML file with no overrides.
pub fn load_config(path: &Path) -> Result<PulseConfig, ConfigError> {
    load_layered(Some(path), |_| {})
}
