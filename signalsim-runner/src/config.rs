//! Run configuration loaded from TOML.
//!
//! ```toml
//! [simulation]
//! initial_capital = 10000.0
//! cost_rate = 0.0003
//!
//! [data]
//! path = "data/sample.csv"
//!
//! [data.columns]
//! timestamp = "datetime"
//! price = "close"
//! signal = "signal"
//!
//! [output]
//! dir = "results"
//! ```
//!
//! Every section and key is optional except `data.path`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use signalsim_core::SimConfig;
use thiserror::Error;

use crate::data_loader::ColumnNames;

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

/// Errors from reading or validating a run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything needed to reproduce one backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub simulation: SimConfig,
    pub data: DataConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Input CSV location and layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub columns: ColumnNames,
}

/// Where run artifacts are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("results"),
        }
    }
}

impl RunConfig {
    /// Config for `path` with default simulation, columns and output.
    pub fn for_data(path: impl Into<PathBuf>) -> Self {
        Self {
            simulation: SimConfig::default(),
            data: DataConfig {
                path: path.into(),
                columns: ColumnNames::default(),
            },
            output: OutputConfig::default(),
        }
    }

    /// Read and validate a TOML config file.
    ///
    /// A relative `data.path` is resolved against the config file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        if config.data.path.is_relative() {
            if let Some(dir) = path.parent() {
                config.data.path = dir.join(&config.data.path);
            }
        }
        Ok(config)
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(format!("serialize: {e}")))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        let cols = &self.data.columns;
        for (key, name) in [
            ("timestamp", &cols.timestamp),
            ("price", &cols.price),
            ("signal", &cols.signal),
        ] {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("column name '{key}' is empty")));
            }
        }
        if cols.price == cols.signal {
            return Err(ConfigError::Invalid(format!(
                "price and signal columns are both '{}'",
                cols.price
            )));
        }
        Ok(())
    }

    /// Deterministic id for this simulation config applied to a dataset.
    ///
    /// Same parameters on the same bars give the same id, regardless of
    /// where the data file lives or where output goes.
    pub fn run_id(&self, dataset_hash: &str) -> RunId {
        run_id(&self.simulation, dataset_hash)
    }
}

/// BLAKE3 over the serialized simulation config plus the dataset hash.
pub fn run_id(simulation: &SimConfig, dataset_hash: &str) -> RunId {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&simulation.initial_capital.to_le_bytes());
    hasher.update(&simulation.cost_rate.to_le_bytes());
    hasher.update(dataset_hash.as_bytes());
    format!("{}", hasher.finalize().to_hex())
}
