//! Forecast export records for downstream consumers

use crate::error::Result;
use crate::forecast::ForecastPoint;
use crate::heuristics::{round2, CategoryForecast};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// Aggregate figures over a forecast horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    pub total_months: usize,
    pub avg_monthly_sales: f64,
    pub total_forecast: f64,
}

impl ForecastSummary {
    /// Summarise predicted sales; an empty forecast summarises to zeros
    pub fn from_points(points: &[ForecastPoint]) -> Self {
        let total: f64 = points.iter().map(|p| p.predicted_sales).sum();
        let average = if points.is_empty() {
            0.0
        } else {
            total / points.len() as f64
        };

        Self {
            total_months: points.len(),
            avg_monthly_sales: round2(average),
            total_forecast: round2(total),
        }
    }
}

/// Complete forecast as written for other systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastExport {
    pub forecast_date: DateTime<Utc>,
    pub model_type: String,
    pub monthly_predictions: Vec<ForecastPoint>,
    pub category_forecast: CategoryForecast,
    pub summary: ForecastSummary,
}

impl ForecastExport {
    /// Assemble an export record, computing the summary from the points
    pub fn new(
        model_type: impl Into<String>,
        monthly_predictions: Vec<ForecastPoint>,
        category_forecast: CategoryForecast,
        forecast_date: DateTime<Utc>,
    ) -> Self {
        let summary = ForecastSummary::from_points(&monthly_predictions);
        Self {
            forecast_date,
            model_type: model_type.into(),
            monthly_predictions,
            category_forecast,
            summary,
        }
    }

    /// Write the record as pretty-printed JSON
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;

        info!(path = %path.display(), months = self.summary.total_months, "exported forecast");
        Ok(())
    }
}
