//! Random forest regression
//!
//! Each tree is a CART regressor grown on a bootstrap sample of the
//! training rows, splitting on the threshold that minimises the summed
//! squared error of the two children. The forest prediction is the mean of
//! the tree predictions. All randomness comes from a single seeded
//! `StdRng`, so a fixed seed reproduces the same forest.

use crate::{check_design, MathError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Minimum relative reduction in squared error for a split to be kept
const MIN_IMPROVEMENT: f64 = 1e-12;

/// Hyperparameters for a random forest
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RandomForestParams {
    /// Number of trees
    pub n_estimators: usize,
    /// Seed for bootstrap sampling
    pub seed: u64,
    /// Maximum tree depth, unlimited when `None`
    pub max_depth: Option<usize>,
    /// Minimum rows a node needs before it may split
    pub min_samples_split: usize,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            seed: 42,
            max_depth: None,
            min_samples_split: 2,
        }
    }
}

/// Node stored in a tree's arena
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A single regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    nodes: Vec<Node>,
    n_features: usize,
}

impl DecisionTreeRegressor {
    /// Grow a tree on the given rows (indices may repeat, as in a bootstrap sample)
    pub fn fit(
        features: &[Vec<f64>],
        targets: &[f64],
        rows: &[usize],
        max_depth: Option<usize>,
        min_samples_split: usize,
    ) -> Result<Self> {
        let n_features = check_design(features, targets)?;
        if rows.is_empty() {
            return Err(MathError::InsufficientData(
                "Cannot grow a tree without rows".to_string(),
            ));
        }
        if let Some(&bad) = rows.iter().find(|&&r| r >= features.len()) {
            return Err(MathError::InvalidInput(format!(
                "Row index {} out of range for {} observations",
                bad,
                features.len()
            )));
        }

        let mut tree = Self {
            nodes: Vec::new(),
            n_features,
        };
        let mut rows = rows.to_vec();
        tree.grow(
            features,
            targets,
            &mut rows,
            0,
            max_depth,
            min_samples_split.max(2),
        );

        Ok(tree)
    }

    /// Recursively grow a subtree and return the index of its root
    fn grow(
        &mut self,
        features: &[Vec<f64>],
        targets: &[f64],
        rows: &mut [usize],
        depth: usize,
        max_depth: Option<usize>,
        min_samples_split: usize,
    ) -> usize {
        let value = rows.iter().map(|&r| targets[r]).sum::<f64>() / rows.len() as f64;
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf { value });

        let depth_reached = max_depth.is_some_and(|max| depth >= max);
        let pure = rows.iter().all(|&r| targets[r] == targets[rows[0]]);
        if depth_reached || pure || rows.len() < min_samples_split {
            return id;
        }

        let Some((feature, threshold)) = best_split(features, targets, rows, self.n_features)
        else {
            return id;
        };

        // Partition rows in place: left side holds values <= threshold
        let mut boundary = 0;
        for i in 0..rows.len() {
            if features[rows[i]][feature] <= threshold {
                rows.swap(i, boundary);
                boundary += 1;
            }
        }

        let (left_rows, right_rows) = rows.split_at_mut(boundary);
        let left = self.grow(
            features,
            targets,
            left_rows,
            depth + 1,
            max_depth,
            min_samples_split,
        );
        let right = self.grow(
            features,
            targets,
            right_rows,
            depth + 1,
            max_depth,
            min_samples_split,
        );

        self.nodes[id] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        id
    }

    /// Predict the target for a single feature row
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.n_features {
            return Err(MathError::InvalidInput(format!(
                "Expected {} features, got {}",
                self.n_features,
                features.len()
            )));
        }

        let mut id = 0;
        loop {
            match self.nodes.get(id) {
                Some(Node::Leaf { value }) => return Ok(*value),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    id = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                None => {
                    return Err(MathError::CalculationError(format!(
                        "Tree node {} does not exist",
                        id
                    )))
                }
            }
        }
    }

    /// Number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Find the (feature, threshold) pair with the lowest child squared error
fn best_split(
    features: &[Vec<f64>],
    targets: &[f64],
    rows: &[usize],
    n_features: usize,
) -> Option<(usize, f64)> {
    let n = rows.len() as f64;
    let total: f64 = rows.iter().map(|&r| targets[r]).sum();
    let total_sq: f64 = rows.iter().map(|&r| targets[r].powi(2)).sum();
    let parent_sse = total_sq - total * total / n;

    let mut best: Option<(usize, f64, f64)> = None;
    let mut sorted = rows.to_vec();

    for feature in 0..n_features {
        sorted.sort_by(|&a, &b| features[a][feature].total_cmp(&features[b][feature]));

        let mut left_sum = 0.0;
        let mut left_sq = 0.0;
        for i in 0..sorted.len() - 1 {
            let y = targets[sorted[i]];
            left_sum += y;
            left_sq += y * y;

            let here = features[sorted[i]][feature];
            let next = features[sorted[i + 1]][feature];
            if here == next {
                continue;
            }

            let left_n = (i + 1) as f64;
            let right_n = n - left_n;
            let right_sum = total - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / left_n)
                + (right_sq - right_sum * right_sum / right_n);

            if best.map_or(true, |(_, _, best_sse)| sse < best_sse) {
                // Adjacent floats can round the midpoint up to `next`
                let mut threshold = (here + next) / 2.0;
                if threshold >= next {
                    threshold = here;
                }
                best = Some((feature, threshold, sse));
            }
        }
    }

    let tolerance = MIN_IMPROVEMENT * total_sq.max(1.0);
    best.filter(|&(_, _, sse)| parent_sse - sse > tolerance)
        .map(|(feature, threshold, _)| (feature, threshold))
}

/// Bootstrap ensemble of regression trees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    params: RandomForestParams,
    trees: Vec<DecisionTreeRegressor>,
}

impl RandomForest {
    /// Fit a forest; the same params and data always give the same forest
    pub fn fit(features: &[Vec<f64>], targets: &[f64], params: RandomForestParams) -> Result<Self> {
        check_design(features, targets)?;
        if params.n_estimators == 0 {
            return Err(MathError::InvalidInput(
                "A forest needs at least one tree".to_string(),
            ));
        }

        let n = features.len();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_estimators);

        for _ in 0..params.n_estimators {
            let sample: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            trees.push(DecisionTreeRegressor::fit(
                features,
                targets,
                &sample,
                params.max_depth,
                params.min_samples_split,
            )?);
        }

        Ok(Self { params, trees })
    }

    /// Predict the target as the mean of all tree predictions
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.predict(features)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    /// Get the fitted trees
    pub fn trees(&self) -> &[DecisionTreeRegressor] {
        &self.trees
    }
}
