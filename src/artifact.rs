//! Persisted score model: the forest plus enough metadata to detect a
//! dataset that no longer matches it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::{Dataset, FeatureColumn, TARGET_COLUMN};
use crate::ml::forest::{ForestError, RandomForestRegressor};
use crate::training::TrainingParams;

/// Bumped whenever the JSON layout changes incompatibly.
pub const MODEL_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum ModelIoError {
    #[error("Unable to create model directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read model {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write model {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to encode model: {0}")]
    Encode(serde_json::Error),
    #[error("Invalid model file {path}: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Unsupported model version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("Model is corrupt: {0}")]
    Invalid(#[from] ForestError),
    #[error("Model has {columns} feature columns but its forest expects {forest}")]
    ColumnCount { columns: usize, forest: usize },
    #[error("Model was trained on columns {expected:?} but the dataset has {found:?}")]
    ColumnMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
}

/// Dataset content changed since the model was trained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintMismatch {
    pub trained_on: String,
    pub current: String,
}

impl std::fmt::Display for FingerprintMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let short = |hex: &str| hex.chars().take(12).collect::<String>();
        write!(
            f,
            "Dataset changed since training (model {}, dataset {}); encodings may not match",
            short(&self.trained_on),
            short(&self.current)
        )
    }
}

/// Trained forest and its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreModel {
    pub model_version: u32,
    pub target_column: String,
    /// Feature order the forest was fit on.
    pub feature_columns: Vec<FeatureColumn>,
    /// blake3 hex digest of the training CSV.
    pub dataset_fingerprint: String,
    pub params: TrainingParams,
    pub forest: RandomForestRegressor,
}

impl ScoreModel {
    pub fn new(dataset: &Dataset, params: TrainingParams, forest: RandomForestRegressor) -> Self {
        Self {
            model_version: MODEL_FORMAT_VERSION,
            target_column: TARGET_COLUMN.to_string(),
            feature_columns: dataset.columns.clone(),
            dataset_fingerprint: dataset.fingerprint.clone(),
            params,
            forest,
        }
    }

    pub fn validate(&self) -> Result<(), ModelIoError> {
        if self.model_version != MODEL_FORMAT_VERSION {
            return Err(ModelIoError::UnsupportedVersion {
                found: self.model_version,
                expected: MODEL_FORMAT_VERSION,
            });
        }
        if self.feature_columns.len() != self.forest.n_features() {
            return Err(ModelIoError::ColumnCount {
                columns: self.feature_columns.len(),
                forest: self.forest.n_features(),
            });
        }
        self.forest.validate()?;
        Ok(())
    }

    /// Write pretty JSON, creating parent directories as needed.
    pub fn save_json(&self, path: &Path) -> Result<(), ModelIoError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| ModelIoError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let bytes = serde_json::to_vec_pretty(self).map_err(ModelIoError::Encode)?;
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, bytes).map_err(|source| ModelIoError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, path).map_err(|source| ModelIoError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Saved model to {}", path.display());
        Ok(())
    }

    /// Read and validate a model written by [`Self::save_json`].
    pub fn load_json(path: &Path) -> Result<Self, ModelIoError> {
        let bytes = fs::read(path).map_err(|source| ModelIoError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let model: Self = serde_json::from_slice(&bytes).map_err(|source| ModelIoError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        model.validate()?;
        tracing::info!(
            "Loaded model from {} ({} trees)",
            path.display(),
            model.forest.trees().len()
        );
        Ok(model)
    }

    /// Column layout must match exactly; a changed fingerprint is only reported.
    pub fn check_dataset(
        &self,
        dataset: &Dataset,
    ) -> Result<Option<FingerprintMismatch>, ModelIoError> {
        if self.feature_columns != dataset.columns {
            return Err(ModelIoError::ColumnMismatch {
                expected: self.feature_columns.iter().map(|c| c.name.clone()).collect(),
                found: dataset.feature_names(),
            });
        }
        if self.dataset_fingerprint == dataset.fingerprint {
            return Ok(None);
        }
        Ok(Some(FingerprintMismatch {
            trained_on: self.dataset_fingerprint.clone(),
            current: dataset.fingerprint.clone(),
        }))
    }

    /// Predict one already scaled feature row.
    pub fn predict(&self, scaled: &[f64]) -> Result<f64, ForestError> {
        self.forest.predict_row(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::sample_dataset;
    use crate::ml::forest::ForestOptions;
    use tempfile::tempdir;

    fn model_for(dataset: &Dataset) -> ScoreModel {
        let x: Vec<Vec<f64>> = (0..dataset.len())
            .map(|i| vec![i as f64; dataset.columns.len()])
            .collect();
        let forest =
            RandomForestRegressor::fit(&x, &dataset.targets(), &ForestOptions::new(3)).unwrap();
        ScoreModel::new(dataset, TrainingParams::default(), forest)
    }

    #[test]
    fn save_then_load_preserves_predictions() {
        let dataset = sample_dataset(8);
        let model = model_for(&dataset);
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("trained_model.json");
        model.save_json(&path).unwrap();
        let loaded = ScoreModel::load_json(&path).unwrap();
        assert_eq!(loaded, model);
        let row = vec![2.0; dataset.columns.len()];
        assert_eq!(loaded.predict(&row).unwrap(), model.predict(&row).unwrap());
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn fingerprint_change_is_reported() {
        let dataset = sample_dataset(8);
        let model = model_for(&dataset);
        assert_eq!(model.check_dataset(&dataset).unwrap(), None);

        let changed = sample_dataset(9);
        let mismatch = model.check_dataset(&changed).unwrap().unwrap();
        assert_eq!(mismatch.trained_on, dataset.fingerprint);
        assert_eq!(mismatch.current, changed.fingerprint);
        assert!(mismatch.to_string().starts_with("Dataset changed since training"));
    }

    #[test]
    fn column_change_is_an_error() {
        let dataset = sample_dataset(8);
        let model = model_for(&dataset);
        let mut other = dataset.clone();
        other.columns.swap(0, 1);
        assert!(matches!(
            model.check_dataset(&other),
            Err(ModelIoError::ColumnMismatch { .. })
        ));
    }

    #[test]
    fn rejects_garbage_and_wrong_versions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, b"not json").unwrap();
        assert!(matches!(
            ScoreModel::load_json(&path),
            Err(ModelIoError::Decode { .. })
        ));

        let mut model = model_for(&sample_dataset(4));
        model.model_version = 99;
        model.save_json(&path).unwrap();
        assert!(matches!(
            ScoreModel::load_json(&path),
            Err(ModelIoError::UnsupportedVersion { found: 99, .. })
        ));

        assert!(matches!(
            ScoreModel::load_json(&dir.path().join("missing.json")),
            Err(ModelIoError::Read { .. })
        ));
    }

    fn node_bits(model: &ScoreModel) -> Vec<u64> {
        use crate::ml::forest::Node;
        model
            .forest
            .trees()
            .iter()
            .flat_map(|tree| tree.nodes.iter())
            .map(|node| match node {
                Node::Split { threshold, .. } => threshold.to_bits(),
                Node::Leaf { value, .. } => value.to_bits(),
            })
            .collect()
    }

    #[test]
    fn reload_keeps_trained_thresholds_bit_exact() {
        let dataset = sample_dataset(60);
        let params = TrainingParams {
            n_estimators: 40,
            ..TrainingParams::default()
        };
        let model = crate::training::train_from_dataset(&dataset, &params)
            .unwrap()
            .model;
        let dir = tempdir().unwrap();
        let path = dir.path().join("trained_model.json");
        model.save_json(&path).unwrap();
        let loaded = ScoreModel::load_json(&path).unwrap();

        let splits = model
            .forest
            .trees()
            .iter()
            .flat_map(|tree| tree.nodes.iter())
            .filter(|node| matches!(node, crate::ml::forest::Node::Split { .. }))
            .count();
        assert!(splits > 0);
        let before = node_bits(&model);
        assert_eq!(node_bits(&loaded), before);
        assert_eq!(loaded, model);
    }
}
