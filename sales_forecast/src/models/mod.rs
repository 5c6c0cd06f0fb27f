//! Trained sales models
//!
//! The trainer produces exactly one of two regressors. They are wrapped in
//! the closed [`TrainedModel`] enum so that the rest of the pipeline only
//! sees a single `predict` capability.

use crate::error::{ForecastError, Result};
use crate::features::FeatureVector;
use forecast_math::{LinearRegression, RandomForest};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod artifact;

pub use artifact::ModelArtifact;

/// Candidate model families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelType {
    #[serde(rename = "Linear Regression")]
    LinearRegression,
    #[serde(rename = "Random Forest")]
    RandomForest,
}

impl ModelType {
    /// Human readable label stored alongside a persisted model
    pub fn label(&self) -> &'static str {
        match self {
            ModelType::LinearRegression => "Linear Regression",
            ModelType::RandomForest => "Random Forest",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A fitted regressor selected by the trainer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "fit")]
pub enum TrainedModel {
    LinearRegression(LinearRegression),
    RandomForest(RandomForest),
}

impl TrainedModel {
    /// Predict monthly sales for one feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let value = match self {
            TrainedModel::LinearRegression(model) => model.predict(features.as_slice())?,
            TrainedModel::RandomForest(model) => model.predict(features.as_slice())?,
        };

        if !value.is_finite() {
            return Err(ForecastError::ModelError(format!(
                "{} produced a non-finite prediction",
                self.model_type()
            )));
        }

        Ok(value)
    }

    /// Family of the fitted model
    pub fn model_type(&self) -> ModelType {
        match self {
            TrainedModel::LinearRegression(_) => ModelType::LinearRegression,
            TrainedModel::RandomForest(_) => ModelType::RandomForest,
        }
    }
}

impl From<LinearRegression> for TrainedModel {
    fn from(model: LinearRegression) -> Self {
        TrainedModel::LinearRegression(model)
    }
}

impl From<RandomForest> for TrainedModel {
    fn from(model: RandomForest) -> Self {
        TrainedModel::RandomForest(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn linear() -> TrainedModel {
        let rows: Vec<Vec<f64>> = (1..=6)
            .map(|m| {
                let date = NaiveDate::from_ymd_opt(2023, m, 1).unwrap();
                FeatureVector::for_month(m as i64, date).as_slice().to_vec()
            })
            .collect();
        let targets: Vec<f64> = (1..=6).map(|m| 1000.0 + 100.0 * m as f64).collect();
        LinearRegression::fit(&rows, &targets).unwrap().into()
    }

    #[test]
    fn test_labels() {
        assert_eq!(ModelType::LinearRegression.label(), "Linear Regression");
        assert_eq!(ModelType::RandomForest.to_string(), "Random Forest");
        assert_eq!(
            serde_json::to_string(&ModelType::RandomForest).unwrap(),
            "\"Random Forest\""
        );
    }

    #[test]
    fn test_predict_dispatch() {
        let model = linear();
        assert_eq!(model.model_type(), ModelType::LinearRegression);

        let date = NaiveDate::from_ymd_opt(2023, 7, 1).unwrap();
        let prediction = model.predict(&FeatureVector::for_month(7, date)).unwrap();
        assert!(prediction.is_finite());
    }
}
