//! Future prediction generation
//!
//! Starting from the last historical month, each step advances the month
//! index by one, asks the model for a raw prediction and scales it by a
//! fixed seasonal multiplier. The learned model under-expresses seasonal
//! swings, and the multiplier is the correction layer for that.

use crate::calendar::Season;
use crate::data::SalesHistory;
use crate::error::{ForecastError, Result};
use crate::features::{FeatureVector, ForecastAnchor, FutureMonth};
use crate::heuristics::{classify_trend, confidence, round2, Trend};
use crate::models::TrainedModel;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Anything that can turn a feature vector into a sales prediction
pub trait Predictor {
    /// Predict monthly sales for one feature vector
    fn predict(&self, features: &FeatureVector) -> Result<f64>;
}

impl Predictor for TrainedModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        TrainedModel::predict(self, features)
    }
}

/// Multiplier applied to the raw model output for a season
pub fn seasonal_multiplier(season: Season) -> f64 {
    match season {
        Season::Winter => 1.2,
        Season::Spring => 1.0,
        Season::Summer => 0.9,
        Season::Fall => 1.1,
    }
}

/// Model output for one future month, before presentation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepPrediction {
    /// The month being predicted
    pub month: FutureMonth,
    /// Raw model output
    pub raw: f64,
    /// Raw output times the seasonal multiplier
    pub adjusted: f64,
}

impl StepPrediction {
    /// 1-based forecast step
    pub fn step(&self) -> usize {
        self.month.step
    }
}

/// One annotated month of a sales forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Month label, e.g. "Jan 2024"
    pub month: String,
    /// Calendar date of the month
    pub date: NaiveDate,
    /// Predicted sales, rounded to cents
    pub predicted_sales: f64,
    /// Observed sales, 0 until supplied
    pub actual_sales: f64,
    pub trend: Trend,
    /// Confidence in percent
    pub confidence: u32,
    pub season: Season,
}

impl ForecastPoint {
    /// Annotate a step prediction with its label, trend and confidence
    pub fn from_step(prediction: &StepPrediction) -> Self {
        let step = prediction.step();
        Self {
            month: month_label(prediction.month.date),
            date: prediction.month.date,
            predicted_sales: round2(prediction.adjusted),
            actual_sales: 0.0,
            trend: classify_trend(step, prediction.adjusted, prediction.raw),
            confidence: confidence(step),
            season: prediction.month.season(),
        }
    }
}

impl fmt::Display for ForecastPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: ${:.2} ({}% confidence) [{}]",
            self.month, self.predicted_sales, self.confidence, self.trend
        )
    }
}

/// Format a date as "Mon YYYY"
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Produces seasonally adjusted predictions from a trained model
#[derive(Debug)]
pub struct ForecastGenerator<'a, P: Predictor + ?Sized = TrainedModel> {
    model: &'a P,
}

impl<'a, P: Predictor + ?Sized> ForecastGenerator<'a, P> {
    /// Create a generator over a borrowed model
    pub fn new(model: &'a P) -> Self {
        Self { model }
    }

    /// Predict a single step past the anchor
    pub fn predict_step(&self, anchor: &ForecastAnchor, step: usize) -> Result<StepPrediction> {
        let month = anchor.future_month(step)?;
        let raw = self
            .model
            .predict(&month.features)
            .map_err(|e| ForecastError::PredictionError {
                step,
                reason: e.to_string(),
            })?;
        let adjusted = raw * seasonal_multiplier(month.season());

        debug!(step, month = %month.date, raw, adjusted, "predicted forecast step");
        Ok(StepPrediction {
            month,
            raw,
            adjusted,
        })
    }

    /// Predict `months_ahead` steps past the anchor.
    ///
    /// A step that fails is left out and logged; the other steps still run.
    pub fn predict_steps(&self, anchor: &ForecastAnchor, months_ahead: usize) -> Vec<StepPrediction> {
        (1..=months_ahead)
            .filter_map(|step| match self.predict_step(anchor, step) {
                Ok(prediction) => Some(prediction),
                Err(e) => {
                    warn!(step, error = %e, "skipping forecast step");
                    None
                }
            })
            .collect()
    }

    /// Forecast the months following the end of a history
    pub fn forecast(&self, history: &SalesHistory, months_ahead: usize) -> Result<Vec<ForecastPoint>> {
        let anchor = ForecastAnchor::from_history(history)?;

        Ok(self
            .predict_steps(&anchor, months_ahead)
            .iter()
            .map(ForecastPoint::from_step)
            .collect())
    }
}
