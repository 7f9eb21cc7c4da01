//! Evaluation metrics for regression models.

use serde::{Deserialize, Serialize};

/// Held-out evaluation summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionReport {
    /// Mean absolute error.
    pub mae: f64,
    /// Coefficient of determination.
    pub r2: f64,
    /// Number of evaluated rows.
    pub samples: usize,
}

impl RegressionReport {
    pub fn evaluate(truth: &[f64], predicted: &[f64]) -> Self {
        Self {
            mae: mean_absolute_error(truth, predicted),
            r2: r2_score(truth, predicted),
            samples: truth.len().min(predicted.len()),
        }
    }
}

/// Mean of `|truth - predicted|`. Returns 0 for empty input.
pub fn mean_absolute_error(truth: &[f64], predicted: &[f64]) -> f64 {
    let n = truth.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    let total: f64 = truth
        .iter()
        .zip(predicted)
        .map(|(t, p)| (t - p).abs())
        .sum();
    total / n as f64
}

/// `1 - SS_res / SS_tot`.
///
/// A constant target yields 1 for a perfect prediction and 0 otherwise.
pub fn r2_score(truth: &[f64], predicted: &[f64]) -> f64 {
    let n = truth.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    let mean = truth[..n].iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = truth[..n].iter().map(|t| (t - mean).powi(2)).sum();
    let ss_res: f64 = truth
        .iter()
        .zip(predicted)
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    if ss_tot == 0.0 {
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }
    1.0 - ss_res / ss_tot
}
