//! # Forecast Math
//!
//! Numeric building blocks for the sales forecasting pipeline.
//! This crate provides the two candidate regressors the trainer chooses
//! between, plus the evaluation helpers used to compare them:
//! - Multivariate least-squares linear regression
//! - Random forest of CART regression trees (seeded bootstrap)
//! - Mean absolute error and a seeded shuffle split

use thiserror::Error;

pub mod forest;
pub mod metrics;
pub mod regression;

pub use forest::{DecisionTreeRegressor, RandomForest, RandomForestParams};
pub use metrics::{mean_absolute_error, train_test_split};
pub use regression::LinearRegression;

/// Errors that can occur in forecasting math
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for forecasting math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Check that a feature matrix is non-empty, rectangular and matches the targets.
///
/// Returns the number of features per row.
pub(crate) fn check_design(features: &[Vec<f64>], targets: &[f64]) -> Result<usize> {
    if features.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot fit a model without observations".to_string(),
        ));
    }

    if features.len() != targets.len() {
        return Err(MathError::InvalidInput(format!(
            "Feature rows ({}) don't match targets ({})",
            features.len(),
            targets.len()
        )));
    }

    let width = features[0].len();
    if width == 0 {
        return Err(MathError::InvalidInput(
            "Feature rows must not be empty".to_string(),
        ));
    }

    if let Some(row) = features.iter().position(|r| r.len() != width) {
        return Err(MathError::InvalidInput(format!(
            "Row {} has {} features, expected {}",
            row,
            features[row].len(),
            width
        )));
    }

    if features.iter().flatten().chain(targets).any(|v| !v.is_finite()) {
        return Err(MathError::InvalidInput(
            "Features and targets must be finite".to_string(),
        ));
    }

    Ok(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_design() {
        let features = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        assert_eq!(check_design(&features, &[1.0, 2.0]).unwrap(), 2);

        assert!(check_design(&[], &[]).is_err());
        assert!(check_design(&features, &[1.0]).is_err());
        assert!(check_design(&[vec![1.0], vec![1.0, 2.0]], &[1.0, 2.0]).is_err());
        assert!(check_design(&[vec![f64::NAN]], &[1.0]).is_err());
    }
}
