//! Random-forest regressor built from bootstrapped CART trees.
//!
//! - Each tree sees `n` rows drawn with replacement from a per-tree seed.
//! - Every feature is considered at every split.
//! - Prediction is the mean of the tree predictions.
//! - Models serialize with serde and validate on load.

mod cart;
mod tree;

pub use tree::{Node, RegressionTree};

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cart::{CartBuilder, TreeOptions};

/// Errors raised when fitting or evaluating a forest.
#[derive(Debug, Error, PartialEq)]
pub enum ForestError {
    #[error("Cannot fit a forest on zero rows")]
    Empty,
    #[error("Feature matrix has {x_rows} rows but target has {y_rows}")]
    LengthMismatch { x_rows: usize, y_rows: usize },
    #[error("Row {row} has {found} features but expected {expected}")]
    FeatureCount {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Row {row} contains a non-finite value")]
    NonFinite { row: usize },
    #[error("Invalid forest options: {0}")]
    InvalidOptions(String),
    #[error("Forest has no trees")]
    NoTrees,
    #[error("Tree {index} is invalid: {reason}")]
    InvalidTree { index: usize, reason: String },
}

/// Hyperparameters for [`RandomForestRegressor::fit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestOptions {
    pub n_estimators: usize,
    /// `None` grows trees until leaves are pure or too small to split.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Draw a bootstrap sample per tree; otherwise every tree sees all rows.
    pub bootstrap: bool,
    /// Tree `i` is seeded with `seed + i`.
    pub seed: u64,
}

impl Default for ForestOptions {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            bootstrap: true,
            seed: 0,
        }
    }
}

impl ForestOptions {
    pub fn new(n_estimators: usize) -> Self {
        Self {
            n_estimators,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn check(&self) -> Result<(), ForestError> {
        if self.n_estimators == 0 {
            return Err(ForestError::InvalidOptions(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if self.min_samples_split < 2 {
            return Err(ForestError::InvalidOptions(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        if self.min_samples_leaf == 0 {
            return Err(ForestError::InvalidOptions(
                "min_samples_leaf must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fitted ensemble of regression trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    n_features: usize,
    trees: Vec<RegressionTree>,
}

impl RandomForestRegressor {
    /// Fit on row-major features `x` and targets `y`.
    pub fn fit(x: &[Vec<f64>], y: &[f64], options: &ForestOptions) -> Result<Self, ForestError> {
        options.check()?;
        if x.len() != y.len() {
            return Err(ForestError::LengthMismatch {
                x_rows: x.len(),
                y_rows: y.len(),
            });
        }
        let n_features = x.first().map(Vec::len).ok_or(ForestError::Empty)?;
        for (row, (features, target)) in x.iter().zip(y).enumerate() {
            if features.len() != n_features {
                return Err(ForestError::FeatureCount {
                    row,
                    expected: n_features,
                    found: features.len(),
                });
            }
            if !target.is_finite() || features.iter().any(|v| !v.is_finite()) {
                return Err(ForestError::NonFinite { row });
            }
        }

        let n = x.len();
        let tree_options = TreeOptions {
            max_depth: options.max_depth,
            min_samples_split: options.min_samples_split,
            min_samples_leaf: options.min_samples_leaf,
        };
        let builder = CartBuilder::new(x, y, tree_options);
        let mut trees = Vec::with_capacity(options.n_estimators);
        for tree_idx in 0..options.n_estimators {
            let sample: Vec<usize> = if options.bootstrap {
                let mut rng = StdRng::seed_from_u64(options.seed.wrapping_add(tree_idx as u64));
                (0..n).map(|_| rng.random_range(0..n)).collect()
            } else {
                (0..n).collect()
            };
            let tree = builder.build(&sample);
            tracing::debug!(
                "Fitted tree {}/{} (depth {}, {} leaves)",
                tree_idx + 1,
                options.n_estimators,
                tree.depth(),
                tree.leaf_count()
            );
            trees.push(tree);
        }

        Ok(Self { n_features, trees })
    }

    /// Number of features each row must carry.
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    /// Mean tree prediction for one row.
    pub fn predict_row(&self, features: &[f64]) -> Result<f64, ForestError> {
        if self.trees.is_empty() {
            return Err(ForestError::NoTrees);
        }
        if features.len() != self.n_features {
            return Err(ForestError::FeatureCount {
                row: 0,
                expected: self.n_features,
                found: features.len(),
            });
        }
        let sum: f64 = self.trees.iter().map(|tree| tree.predict(features)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    /// Predict every row of `x`.
    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>, ForestError> {
        x.iter()
            .enumerate()
            .map(|(row, features)| {
                self.predict_row(features).map_err(|err| match err {
                    ForestError::FeatureCount {
                        expected, found, ..
                    } => ForestError::FeatureCount {
                        row,
                        expected,
                        found,
                    },
                    other => other,
                })
            })
            .collect()
    }

    /// Check structural invariants of every tree.
    pub fn validate(&self) -> Result<(), ForestError> {
        if self.trees.is_empty() {
            return Err(ForestError::NoTrees);
        }
        for (index, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|reason| ForestError::InvalidTree { index, reason })?;
        }
        Ok(())
    }
}
