//! Offline training pipeline: CSV to evaluated, serialized forest.
//!
//! Encoders are fit on every row, the scaler on the training split only, and
//! the forest on the scaled training split. Metrics come from the scaled test
//! split.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::artifact::ScoreModel;
use crate::dataset::{Dataset, DatasetError, load_dataset};
use crate::ml::forest::{ForestError, ForestOptions, RandomForestRegressor};
use crate::ml::metrics::RegressionReport;
use crate::ml::scaler::{ScalerError, StandardScaler};
use crate::ml::split::{SplitError, take_rows, train_test_split};
use crate::preprocess::{EncodeError, Preprocessor};

/// Forest and split hyperparameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingParams {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            max_depth: 10,
            test_fraction: 0.2,
            seed: 42,
        }
    }
}

impl TrainingParams {
    pub fn forest_options(&self) -> ForestOptions {
        ForestOptions::new(self.n_estimators)
            .with_max_depth(self.max_depth)
            .with_seed(self.seed)
    }
}

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("Failed to encode dataset: {0}")]
    Encode(#[from] EncodeError),
    #[error("Failed to split dataset: {0}")]
    Split(#[from] SplitError),
    #[error("Failed to scale features: {0}")]
    Scale(#[from] ScalerError),
    #[error("Failed to fit forest: {0}")]
    Forest(#[from] ForestError),
}

/// Result of one training run.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub model: ScoreModel,
    pub report: RegressionReport,
    pub train_rows: usize,
    pub test_rows: usize,
}

/// Load `path` and train on it.
pub fn train_from_csv(path: &Path, params: &TrainingParams) -> Result<TrainingOutcome, TrainingError> {
    let dataset = load_dataset(path)?;
    train_from_dataset(&dataset, params)
}

/// Run the pipeline on an already loaded dataset.
pub fn train_from_dataset(
    dataset: &Dataset,
    params: &TrainingParams,
) -> Result<TrainingOutcome, TrainingError> {
    let preprocessor = Preprocessor::fit(dataset);
    let encoded = preprocessor.encode_dataset(dataset)?;

    let split = train_test_split(dataset.len(), params.test_fraction, params.seed)?;
    let x_train = take_rows(&encoded.x, &split.train);
    let y_train = take_rows(&encoded.y, &split.train);
    let x_test = take_rows(&encoded.x, &split.test);
    let y_test = take_rows(&encoded.y, &split.test);
    tracing::info!(
        "Split {} rows into {} train / {} test (seed {})",
        dataset.len(),
        x_train.len(),
        x_test.len(),
        params.seed
    );

    let scaler = StandardScaler::fit(&x_train)?;
    let x_train = scaler.transform(&x_train)?;
    let x_test = scaler.transform(&x_test)?;

    tracing::info!(
        "Fitting {} trees (max depth {})",
        params.n_estimators,
        params.max_depth
    );
    let forest = RandomForestRegressor::fit(&x_train, &y_train, &params.forest_options())?;
    let predicted = forest.predict(&x_test)?;
    let report = RegressionReport::evaluate(&y_test, &predicted);
    tracing::info!(
        "Held-out MAE {:.4}, R² {:.4} over {} rows",
        report.mae,
        report.r2,
        report.samples
    );

    Ok(TrainingOutcome {
        model: ScoreModel::new(dataset, params.clone(), forest),
        report,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::sample_dataset;

    fn small_params() -> TrainingParams {
        TrainingParams {
            n_estimators: 25,
            ..TrainingParams::default()
        }
    }

    #[test]
    fn defaults_match_reference_pipeline() {
        let params = TrainingParams::default();
        assert_eq!(params.n_estimators, 200);
        assert_eq!(params.max_depth, 10);
        assert_eq!(params.test_fraction, 0.2);
        assert_eq!(params.seed, 42);
        let options = params.forest_options();
        assert_eq!(options.max_depth, Some(10));
        assert!(options.bootstrap);
    }

    #[test]
    fn trains_and_reports_metrics() {
        let dataset = sample_dataset(60);
        let outcome = train_from_dataset(&dataset, &small_params()).unwrap();
        assert_eq!(outcome.test_rows, 12);
        assert_eq!(outcome.train_rows, 48);
        assert_eq!(outcome.report.samples, 12);
        assert!(outcome.report.mae >= 0.0);
        assert!(outcome.report.r2 <= 1.0);
        assert_eq!(outcome.model.forest.trees().len(), 25);
        assert_eq!(outcome.model.dataset_fingerprint, dataset.fingerprint);
    }

    #[test]
    fn same_seed_same_metrics() {
        let dataset = sample_dataset(40);
        let a = train_from_dataset(&dataset, &small_params()).unwrap();
        let b = train_from_dataset(&dataset, &small_params()).unwrap();
        assert_eq!(a.report, b.report);
        assert_eq!(a.model.forest, b.model.forest);
    }

    #[test]
    fn single_row_cannot_be_split() {
        let dataset = sample_dataset(1);
        assert!(matches!(
            train_from_dataset(&dataset, &small_params()),
            Err(TrainingError::Split(SplitError::TooFewRows { rows: 1, .. }))
        ));
    }
}
