//! Synthetic forecast used when no trained model can answer
//!
//! The fallback has no historical anchor, so it counts forward from the
//! current date in 30-day steps. Its trend rule only distinguishes the
//! first three steps (Growing) from the rest (Stable) and never reports a
//! decline, unlike the model-driven classifier.

use crate::calendar::season_of;
use crate::config::FallbackConfig;
use crate::forecast::{month_label, ForecastPoint};
use crate::heuristics::{confidence, round2, Trend};
use chrono::{Datelike, Duration, NaiveDate};

/// Days between consecutive fallback months
const DAYS_PER_STEP: i64 = 30;

/// Steps reported as Growing before the fallback settles on Stable
const GROWING_STEPS: usize = 3;

/// Seasonal factor for a calendar month (1-12)
pub fn monthly_factor(month: u32) -> f64 {
    match month {
        12 | 1 => 1.3,
        2 => 1.2,
        3 | 4 => 1.1,
        5 => 1.0,
        6..=8 => 0.9,
        9 => 1.1,
        10 | 11 => 1.2,
        _ => 1.0,
    }
}

/// Produces synthetic forecasts from fixed growth and seasonality
#[derive(Debug, Clone, Default)]
pub struct FallbackPredictor {
    config: FallbackConfig,
}

impl FallbackPredictor {
    /// Create a fallback predictor with the given settings
    pub fn new(config: FallbackConfig) -> Self {
        Self { config }
    }

    /// Forecast `months_ahead` points counting forward from `today`
    pub fn predict(&self, months_ahead: usize, today: NaiveDate) -> Vec<ForecastPoint> {
        (1..=months_ahead)
            .map_while(|step| {
                let date = today.checked_add_signed(Duration::days(DAYS_PER_STEP * step as i64))?;
                Some(self.point(step, date))
            })
            .collect()
    }

    /// Build the point for one step
    fn point(&self, step: usize, date: NaiveDate) -> ForecastPoint {
        let growth = 1.0 + self.config.monthly_growth * step as f64;
        let predicted = self.config.base_amount * growth * monthly_factor(date.month());

        let actual_sales = if step == 1 {
            round2(predicted * self.config.actual_ratio)
        } else {
            0.0
        };
        let trend = if step <= GROWING_STEPS {
            Trend::Growing
        } else {
            Trend::Stable
        };

        ForecastPoint {
            month: month_label(date),
            date,
            predicted_sales: round2(predicted),
            actual_sales,
            trend,
            confidence: confidence(step),
            season: season_of(date.month()),
        }
    }
}
