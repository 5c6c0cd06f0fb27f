//! Candidate training and model selection
//!
//! Both candidates are fitted on the same seeded training partition and
//! scored by mean absolute error on the held-out partition. The one with the
//! strictly lower error wins; a tie keeps the linear model.

use crate::config::TrainerConfig;
use crate::data::SalesHistory;
use crate::error::{ForecastError, Result};
use crate::features::{build_history_features, HistoricalFeatures};
use crate::models::{ModelType, TrainedModel};
use forecast_math::{
    mean_absolute_error, train_test_split, LinearRegression, RandomForest, RandomForestParams,
};
use std::fmt;
use tracing::{debug, info};

/// A fitted candidate with its held-out error
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub model: TrainedModel,
    pub mae: f64,
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingOutcome {
    /// The selected model
    pub model: TrainedModel,
    /// Family of the selected model
    pub model_type: ModelType,
    /// Held-out MAE of the linear candidate
    pub linear_mae: f64,
    /// Held-out MAE of the random forest candidate
    pub forest_mae: f64,
}

impl TrainingOutcome {
    /// Held-out MAE of the selected model
    pub fn best_mae(&self) -> f64 {
        match self.model_type {
            ModelType::LinearRegression => self.linear_mae,
            ModelType::RandomForest => self.forest_mae,
        }
    }
}

impl fmt::Display for TrainingOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model Selection:")?;
        writeln!(f, "  Linear Regression MAE: {:.2}", self.linear_mae)?;
        writeln!(f, "  Random Forest MAE:     {:.2}", self.forest_mae)?;
        writeln!(f, "  Best Model: {} (MAE: {:.2})", self.model_type, self.best_mae())?;
        Ok(())
    }
}

/// Pick the candidate with strictly lower held-out MAE, preferring linear on ties
pub fn select_model(linear: Candidate, forest: Candidate) -> TrainingOutcome {
    let (linear_mae, forest_mae) = (linear.mae, forest.mae);
    let chosen = if forest.mae < linear.mae { forest } else { linear };

    TrainingOutcome {
        model_type: chosen.model.model_type(),
        model: chosen.model,
        linear_mae,
        forest_mae,
    }
}

/// Fits and selects between the linear and random forest candidates
#[derive(Debug, Clone, Default)]
pub struct ModelTrainer {
    config: TrainerConfig,
}

impl ModelTrainer {
    /// Create a trainer with the given settings
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// Build features from a history and train on them
    pub fn train_history(&self, history: &SalesHistory) -> Result<TrainingOutcome> {
        let features = build_history_features(history)?;
        self.train(&features)
    }

    /// Train both candidates and keep the better one
    pub fn train(&self, data: &HistoricalFeatures) -> Result<TrainingOutcome> {
        if data.len() < self.config.min_records {
            return Err(ForecastError::InsufficientData(format!(
                "Need at least {} monthly records to train, have {}",
                self.config.min_records,
                data.len()
            )));
        }

        let rows = data.rows();
        let (train_idx, test_idx) =
            train_test_split(rows.len(), self.config.test_ratio, self.config.seed)?;
        debug!(
            train = train_idx.len(),
            test = test_idx.len(),
            "split historical records"
        );

        let pick = |idx: &[usize]| -> (Vec<Vec<f64>>, Vec<f64>) {
            idx.iter()
                .map(|&i| (rows[i].clone(), data.targets[i]))
                .unzip()
        };
        let (x_train, y_train) = pick(&train_idx);
        let (x_test, y_test) = pick(&test_idx);

        let linear = LinearRegression::fit(&x_train, &y_train)?;
        let linear_pred = x_test
            .iter()
            .map(|x| linear.predict(x))
            .collect::<forecast_math::Result<Vec<f64>>>()?;
        let linear_mae = mean_absolute_error(&linear_pred, &y_test)?;

        let params = RandomForestParams {
            n_estimators: self.config.n_estimators,
            seed: self.config.seed,
            ..RandomForestParams::default()
        };
        let forest = RandomForest::fit(&x_train, &y_train, params)?;
        let forest_pred = x_test
            .iter()
            .map(|x| forest.predict(x))
            .collect::<forecast_math::Result<Vec<f64>>>()?;
        let forest_mae = mean_absolute_error(&forest_pred, &y_test)?;

        let outcome = select_model(
            Candidate {
                model: linear.into(),
                mae: linear_mae,
            },
            Candidate {
                model: forest.into(),
                mae: forest_mae,
            },
        );

        info!(
            linear_mae = outcome.linear_mae,
            forest_mae = outcome.forest_mae,
            model_type = %outcome.model_type,
            "selected sales model"
        );

        Ok(outcome)
    }
}
