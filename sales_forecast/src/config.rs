//! Configuration for training, forecasting and the fallback path

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Model selection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerConfig {
    /// Share of records withheld for scoring the candidates
    pub test_ratio: f64,
    /// Seed for the split and for the forest's bootstrap samples
    pub seed: u64,
    /// Number of trees in the random forest candidate
    pub n_estimators: usize,
    /// Minimum number of historical records needed to train
    pub min_records: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.3,
            seed: 42,
            n_estimators: 100,
            min_records: 4,
        }
    }
}

/// Synthetic forecast settings used when no model is available
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Monthly sales before growth and seasonality
    pub base_amount: f64,
    /// Growth added per forecast step (0.02 is 2% per month)
    pub monthly_growth: f64,
    /// Ratio of the first prediction reported as its placeholder actual
    pub actual_ratio: f64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            base_amount: 2500.0,
            monthly_growth: 0.02,
            actual_ratio: 0.95,
        }
    }
}

/// Top-level forecasting configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Historical sales CSV
    pub data_path: PathBuf,
    /// Persisted model artifact
    pub model_path: PathBuf,
    /// Horizon used when a request gives none or an invalid one
    pub default_months_ahead: usize,
    /// Longest horizon a request may ask for
    pub max_months_ahead: usize,
    pub trainer: TrainerConfig,
    pub fallback: FallbackConfig,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("sales_data.csv"),
            model_path: PathBuf::from("sales_model.json"),
            default_months_ahead: 6,
            max_months_ahead: 24,
            trainer: TrainerConfig::default(),
            fallback: FallbackConfig::default(),
        }
    }
}

impl ForecastConfig {
    /// Load a configuration from a JSON file; missing keys take their defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ForecastError::DataNotFound(path.display().to_string()));
        }

        let config: Self = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the settings are usable
    pub fn validate(&self) -> Result<()> {
        let trainer = &self.trainer;
        if trainer.test_ratio <= 0.0 || trainer.test_ratio >= 1.0 {
            return Err(ForecastError::InvalidParameter(
                "test_ratio must be between 0 and 1 (exclusive)".to_string(),
            ));
        }
        if trainer.n_estimators == 0 {
            return Err(ForecastError::InvalidParameter(
                "n_estimators must be positive".to_string(),
            ));
        }
        if trainer.min_records < 2 {
            return Err(ForecastError::InvalidParameter(
                "min_records must be at least 2".to_string(),
            ));
        }
        if self.default_months_ahead == 0 || self.max_months_ahead < self.default_months_ahead {
            return Err(ForecastError::InvalidParameter(format!(
                "default_months_ahead ({}) must be in 1..={}",
                self.default_months_ahead, self.max_months_ahead
            )));
        }
        if !self.fallback.base_amount.is_finite() || self.fallback.base_amount < 0.0 {
            return Err(ForecastError::InvalidParameter(
                "fallback base_amount must be a non-negative number".to_string(),
            ));
        }

        Ok(())
    }

    /// Clamp a requested horizon.
    ///
    /// Missing or out-of-range requests fall back to the default horizon
    /// rather than failing.
    pub fn months_ahead(&self, requested: Option<i64>) -> usize {
        match requested {
            Some(months) if months >= 1 && months <= self.max_months_ahead as i64 => {
                months as usize
            }
            _ => self.default_months_ahead,
        }
    }
}
