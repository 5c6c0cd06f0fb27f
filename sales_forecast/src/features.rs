//! Feature construction for monthly sales models
//!
//! Every month, historical or future, is encoded as
//! `[month_index, month_of_year, quarter, fall, spring, summer, winter]`.
//! The month index counts months from January of the earliest historical
//! year, so it keeps increasing without gaps into the forecast horizon.

use crate::calendar::{quarter_of, season_of, Season};
use crate::data::SalesHistory;
use crate::error::{ForecastError, Result};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of features per month
pub const FEATURE_COUNT: usize = 7;

/// Fixed-length numeric encoding of one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Encode a calendar month with its running month index
    pub fn for_month(month_index: i64, date: NaiveDate) -> Self {
        let month = date.month();
        let [fall, spring, summer, winter] = season_of(month).one_hot();

        Self([
            month_index as f64,
            month as f64,
            quarter_of(month) as f64,
            fall,
            spring,
            summer,
            winter,
        ])
    }

    /// Get the features as a slice, in model input order
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Get the running month index
    pub fn month_index(&self) -> i64 {
        self.0[0] as i64
    }

    /// Get the month of the year (1-12)
    pub fn month_of_year(&self) -> u32 {
        self.0[1] as u32
    }

    /// Get the calendar quarter (1-4)
    pub fn quarter(&self) -> u32 {
        self.0[2] as u32
    }

    /// Get the season whose indicator is set
    pub fn season(&self) -> Season {
        Season::ONE_HOT_ORDER
            .into_iter()
            .zip(&self.0[3..])
            .find(|&(_, &flag)| flag == 1.0)
            .map(|(season, _)| season)
            .unwrap_or_else(|| season_of(self.month_of_year()))
    }
}

/// Month index of `date` relative to January of `min_year`
pub fn month_index(date: NaiveDate, min_year: i32) -> i64 {
    date.month() as i64 + 12 * (date.year() as i64 - min_year as i64)
}

/// Training matrix built from a sales history
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalFeatures {
    /// One feature vector per historical month
    pub features: Vec<FeatureVector>,
    /// Sales for each month, aligned with `features`
    pub targets: Vec<f64>,
}

impl HistoricalFeatures {
    /// Feature rows as plain vectors, the layout the regressors expect
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.features.iter().map(|f| f.as_slice().to_vec()).collect()
    }

    /// Number of historical months
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Check if there are no historical months
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Build training features and targets from a history.
///
/// An empty history has no earliest year to anchor the month index and is
/// reported as [`ForecastError::EmptyHistory`].
pub fn build_history_features(history: &SalesHistory) -> Result<HistoricalFeatures> {
    let min_year = history.min_year()?;

    let (features, targets): (Vec<FeatureVector>, Vec<f64>) = history
        .records()
        .iter()
        .map(|r| (FeatureVector::for_month(month_index(r.month, min_year), r.month), r.sales))
        .unzip();

    Ok(HistoricalFeatures { features, targets })
}

/// Last historical month and its index, the starting point of every forecast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastAnchor {
    /// Date of the last historical record
    pub date: NaiveDate,
    /// Month index of the last historical record
    pub month_index: i64,
}

impl ForecastAnchor {
    /// Take the anchor from the tail of a history
    pub fn from_history(history: &SalesHistory) -> Result<Self> {
        let min_year = history.min_year()?;
        let last = history.last().ok_or(ForecastError::EmptyHistory)?;

        Ok(Self {
            date: last.month,
            month_index: month_index(last.month, min_year),
        })
    }

    /// Build the month `step` whole months after the anchor.
    ///
    /// The day of month is clamped to the last valid day of the target month.
    pub fn future_month(&self, step: usize) -> Result<FutureMonth> {
        let date = u32::try_from(step)
            .ok()
            .and_then(|s| self.date.checked_add_months(Months::new(s)))
            .ok_or_else(|| {
                ForecastError::DateError(format!(
                    "Cannot advance {} by {} months",
                    self.date, step
                ))
            })?;
        let month_index = self.month_index + step as i64;

        Ok(FutureMonth {
            step,
            date,
            features: FeatureVector::for_month(month_index, date),
        })
    }
}

/// A month in the forecast horizon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FutureMonth {
    /// 1-based step past the last historical month
    pub step: usize,
    /// Calendar date of the month
    pub date: NaiveDate,
    /// Model input for the month
    pub features: FeatureVector,
}

impl FutureMonth {
    /// Season of the month
    pub fn season(&self) -> Season {
        self.features.season()
    }
}
