//! Evaluation helpers for comparing fitted models

use crate::{MathError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Calculate the mean absolute error between predictions and actual values
pub fn mean_absolute_error(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    if predicted.len() != actual.len() || predicted.is_empty() {
        return Err(MathError::InvalidInput(
            "Predicted and actual values must have the same non-zero length".to_string(),
        ));
    }

    let sum: f64 = predicted
        .iter()
        .zip(actual)
        .map(|(p, a)| (p - a).abs())
        .sum();

    Ok(sum / predicted.len() as f64)
}

/// Shuffle `0..n` with a seeded RNG and split it into (train, test) row indices.
///
/// The test partition gets `ceil(n * test_ratio)` rows. Both partitions are
/// guaranteed to be non-empty.
pub fn train_test_split(n: usize, test_ratio: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    if test_ratio <= 0.0 || test_ratio >= 1.0 {
        return Err(MathError::InvalidInput(
            "Test ratio must be between 0 and 1 (exclusive)".to_string(),
        ));
    }

    if n < 2 {
        return Err(MathError::InsufficientData(format!(
            "Need at least 2 observations to split, have {}",
            n
        )));
    }

    let test_size = ((n as f64 * test_ratio).ceil() as usize).clamp(1, n - 1);

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(test_size);
    Ok((train, indices))
}
