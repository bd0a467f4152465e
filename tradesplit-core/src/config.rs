//! Serializable breakdown configuration.
//!
//! Every field has a default, so a TOML file only needs to name what it
//! overrides:
//!
//! ```toml
//! start_temperature = 11000.0
//! cooling_factor = 0.999
//! swap_policy = "FAST_SWAP"
//! min_lot_size = 100
//! seed = 42
//! ```

use crate::error::BreakdownError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// How much quantity a proposed swap moves between two client/trade pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwapPolicy {
    /// Move the largest quantity both legs can give up.
    FastSwap,
    /// Move a random quantity strictly below that maximum.
    #[default]
    RandomSwap,
}

impl SwapPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            SwapPolicy::FastSwap => "fast_swap",
            SwapPolicy::RandomSwap => "random_swap",
        }
    }
}

/// Parameters for a single breakdown run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakdownConfig {
    /// Initial annealing temperature (how loosely worse moves are accepted).
    pub start_temperature: f64,
    /// Per-iteration geometric decay, strictly inside (0, 1).
    pub cooling_factor: f64,
    pub swap_policy: SwapPolicy,
    /// Minimum tradable unit; every quantity must be a multiple of it.
    pub min_lot_size: u64,
    /// Seed for the run's RNG. `None` draws one from OS entropy.
    pub seed: Option<u64>,
}

impl Default for BreakdownConfig {
    fn default() -> Self {
        Self {
            start_temperature: 1100.0,
            cooling_factor: 0.995,
            swap_policy: SwapPolicy::RandomSwap,
            min_lot_size: 1,
            seed: None,
        }
    }
}

/// Errors from loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] BreakdownError),
}

impl BreakdownConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_policy(mut self, policy: SwapPolicy) -> Self {
        self.swap_policy = policy;
        self
    }

    pub fn with_lot_size(mut self, lot: u64) -> Self {
        self.min_lot_size = lot;
        self
    }

    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject schedules that cannot terminate or cannot cool.
    ///
    /// Lot size is checked here and again by the input validator, which
    /// reports it alongside the quantities it must divide.
    pub fn validate(&self) -> Result<(), BreakdownError> {
        if !self.start_temperature.is_finite() || self.start_temperature <= 0.0 {
            return Err(BreakdownError::InvalidConfig(format!(
                "start_temperature must be finite and positive, got {}",
                self.start_temperature
            )));
        }
        if !(self.cooling_factor > 0.0 && self.cooling_factor < 1.0) {
            return Err(BreakdownError::InvalidConfig(format!(
                "cooling_factor must be strictly between 0 and 1, got {}",
                self.cooling_factor
            )));
        }
        if self.min_lot_size < 1 {
            return Err(BreakdownError::InvalidConfig(
                "min_lot_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of cooling steps before the temperature reaches 1.
    ///
    /// This is the iteration budget of a run that never finds a perfect
    /// allocation: `ceil(ln(1 / T0) / ln(cooling))`, zero when `T0 <= 1`.
    pub fn expected_iterations(&self) -> u64 {
        if self.start_temperature <= 1.0 {
            return 0;
        }
        let steps = (1.0 / self.start_temperature).ln() / self.cooling_factor.ln();
        steps.ceil() as u64
    }
}
