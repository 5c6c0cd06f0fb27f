//! Ordinary least-squares linear regression
//!
//! Fits `y = intercept + sum(coef_j * x_j)` over any number of features.
//! The intercept is handled by centering, and the normal equations are
//! solved with Gauss-Jordan elimination. Columns that are linearly
//! dependent on earlier ones (for example a one-hot group next to the
//! intercept) get a zero coefficient, which still yields a least-squares
//! solution.

use crate::{check_design, MathError, Result};
use serde::{Deserialize, Serialize};

/// Relative pivot tolerance used to detect dependent columns
const PIVOT_TOLERANCE: f64 = 1e-9;

/// Fitted multivariate linear regression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegression {
    /// Fit an unregularized linear model with intercept
    pub fn fit(features: &[Vec<f64>], targets: &[f64]) -> Result<Self> {
        let width = check_design(features, targets)?;
        let n = features.len() as f64;

        let x_mean: Vec<f64> = (0..width)
            .map(|j| features.iter().map(|row| row[j]).sum::<f64>() / n)
            .collect();
        let y_mean = targets.iter().sum::<f64>() / n;

        // Augmented normal equations [Xc'Xc | Xc'yc]
        let mut system = vec![vec![0.0; width + 1]; width];
        for (row, &y) in features.iter().zip(targets) {
            let yc = y - y_mean;
            for i in 0..width {
                let xi = row[i] - x_mean[i];
                for j in 0..width {
                    system[i][j] += xi * (row[j] - x_mean[j]);
                }
                system[i][width] += xi * yc;
            }
        }

        let coefficients = solve_normal_equations(system, width)?;
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_mean)
                .map(|(c, m)| c * m)
                .sum::<f64>();

        Ok(Self {
            coefficients,
            intercept,
        })
    }

    /// Predict the target for a single feature row
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.coefficients.len() {
            return Err(MathError::InvalidInput(format!(
                "Expected {} features, got {}",
                self.coefficients.len(),
                features.len()
            )));
        }

        Ok(self.intercept
            + self
                .coefficients
                .iter()
                .zip(features)
                .map(|(c, x)| c * x)
                .sum::<f64>())
    }

    /// Get the fitted coefficients, one per feature
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Get the fitted intercept
    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Reduce the augmented system to row echelon form, leaving free columns at zero
fn solve_normal_equations(mut system: Vec<Vec<f64>>, width: usize) -> Result<Vec<f64>> {
    let scale = (0..width)
        .map(|i| system[i][i].abs())
        .fold(1.0_f64, f64::max);
    let tolerance = PIVOT_TOLERANCE * scale;

    let mut pivot_rows: Vec<Option<usize>> = vec![None; width];
    let mut next_row = 0;

    for col in 0..width {
        if next_row == width {
            break;
        }

        let (best_row, best_value) = (next_row..width)
            .map(|r| (r, system[r][col].abs()))
            .fold((next_row, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });

        if best_value <= tolerance {
            // Dependent column
            continue;
        }

        system.swap(next_row, best_row);
        let pivot = system[next_row][col];
        for value in system[next_row].iter_mut() {
            *value /= pivot;
        }

        for r in 0..width {
            if r != next_row {
                let factor = system[r][col];
                if factor != 0.0 {
                    for c in 0..=width {
                        system[r][c] -= factor * system[next_row][c];
                    }
                }
            }
        }

        pivot_rows[col] = Some(next_row);
        next_row += 1;
    }

    let coefficients: Vec<f64> = pivot_rows
        .iter()
        .map(|row| row.map_or(0.0, |r| system[r][width]))
        .collect();

    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(MathError::CalculationError(
            "Normal equations produced non-finite coefficients".to_string(),
        ));
    }

    Ok(coefficients)
}
