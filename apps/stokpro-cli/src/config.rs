//! CLI configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. Command-line flags override both.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use stokpro_core::{UnitLabels, DEFAULT_TOP_PRODUCTS};

/// How reports are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(()),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// Snapshot file exported from the backend
    pub snapshot_path: PathBuf,

    /// Output format
    pub format: OutputFormat,

    /// Currency symbol for money columns
    pub currency_symbol: String,

    /// Labels for piece / pack / carton
    pub labels: UnitLabels,

    /// Number of best sellers on the dashboard
    pub top_products: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            snapshot_path: PathBuf::from("./snapshot.json"),
            format: OutputFormat::Text,
            currency_symbol: "Rp".to_string(),
            labels: UnitLabels::default(),
            top_products: DEFAULT_TOP_PRODUCTS,
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = CliConfig::default();

        let format = match lookup("STOKPRO_FORMAT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidValue("STOKPRO_FORMAT".to_string()))?,
            None => defaults.format,
        };

        let top_products = match lookup("STOKPRO_TOP_PRODUCTS") {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidValue("STOKPRO_TOP_PRODUCTS".to_string())),
            },
            None => defaults.top_products,
        };

        let label = |key: &str, default: String| -> Result<String, ConfigError> {
            match lookup(key) {
                Some(raw) if raw.trim().is_empty() => Err(ConfigError::InvalidValue(key.to_string())),
                Some(raw) => Ok(raw.trim().to_string()),
                None => Ok(default),
            }
        };

        Ok(CliConfig {
            snapshot_path: lookup("STOKPRO_SNAPSHOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_path),

            format,

            currency_symbol: lookup("STOKPRO_CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),

            labels: UnitLabels {
                piece: label("STOKPRO_LABEL_PIECE", defaults.labels.piece)?,
                pack: label("STOKPRO_LABEL_PACK", defaults.labels.pack)?,
                carton: label("STOKPRO_LABEL_CARTON", defaults.labels.carton)?,
            },

            top_products,
        })
    }

    /// Applies command-line overrides.
    pub fn with_overrides(mut self, snapshot: Option<PathBuf>, format: Option<OutputFormat>) -> Self {
        if let Some(path) = snapshot {
            self.snapshot_path = path;
        }
        if let Some(format) = format {
            self.format = format;
        }
        self
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
