//! Turns form input into a score.
//!
//! Encoders and the scaler are rebuilt from the full dataset on every launch,
//! so the dataset on disk must be the one the model was trained on. The
//! model's recorded fingerprint is compared against it and any difference is
//! kept as a warning for the UI.

use std::path::Path;

use thiserror::Error;

use crate::artifact::{FingerprintMismatch, ModelIoError, ScoreModel};
use crate::dataset::{ColumnKind, Dataset, DatasetError, LEVEL_RANGE, RawValue, load_dataset};
use crate::ml::forest::ForestError;
use crate::ml::scaler::{ScalerError, StandardScaler};
use crate::preprocess::{EncodeError, Preprocessor};

/// Failures while preparing the predictor at startup.
#[derive(Debug, Error)]
pub enum PredictorError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Model(#[from] ModelIoError),
    #[error("Failed to encode dataset: {0}")]
    Encode(#[from] EncodeError),
    #[error("Failed to fit scaler: {0}")]
    Scale(#[from] ScalerError),
}

/// Failures for a single prediction attempt.
#[derive(Debug, Error, PartialEq)]
pub enum PredictionError {
    #[error("{value:?} is not a known option for {column}")]
    InvalidCategory { column: String, value: String },
    #[error("Invalid value {value:?} for {column}: expected a whole number")]
    InvalidInteger { column: String, value: String },
    #[error("Invalid value {value:?} for {column}: expected a number")]
    InvalidNumber { column: String, value: String },
    #[error("Expected {expected} field values but got {found}")]
    MissingField { expected: usize, found: usize },
    #[error("Failed to encode input: {0}")]
    Encode(#[from] EncodeError),
    #[error("Failed to scale input: {0}")]
    Scale(#[from] ScalerError),
    #[error("Model failed: {0}")]
    Model(#[from] ForestError),
}

impl PredictionError {
    /// Title of the modal shown for this error.
    pub fn dialog_title(&self) -> &'static str {
        match self {
            PredictionError::InvalidCategory { .. } => "Invalid Input",
            _ => "Error",
        }
    }

    /// Body of the modal shown for this error.
    pub fn dialog_message(&self) -> String {
        match self {
            PredictionError::InvalidCategory { column, .. } => {
                format!("Please select a valid option for {column}.")
            }
            other => format!("An error occurred:\n{other}"),
        }
    }
}

/// One input control of the prediction form.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: ColumnKind,
    /// Dropdown entries; empty for free-text fields.
    pub options: Vec<String>,
}

impl FieldSpec {
    /// Initial text shown in the control.
    pub fn default_value(&self) -> String {
        match self.kind {
            ColumnKind::Level => LEVEL_RANGE.start().to_string(),
            ColumnKind::Categorical | ColumnKind::Continuous => String::new(),
        }
    }
}

/// Loaded model plus the preprocessing rebuilt from its dataset.
#[derive(Debug, Clone)]
pub struct Predictor {
    model: ScoreModel,
    preprocessor: Preprocessor,
    scaler: StandardScaler,
    fields: Vec<FieldSpec>,
    drift: Option<FingerprintMismatch>,
}

impl Predictor {
    /// Load both files from disk.
    pub fn load(dataset_path: &Path, model_path: &Path) -> Result<Self, PredictorError> {
        let dataset = load_dataset(dataset_path)?;
        let model = ScoreModel::load_json(model_path)?;
        Self::new(model, &dataset)
    }

    pub fn new(model: ScoreModel, dataset: &Dataset) -> Result<Self, PredictorError> {
        let drift = model.check_dataset(dataset)?;
        if let Some(mismatch) = &drift {
            tracing::warn!("{mismatch}");
        }
        let preprocessor = Preprocessor::fit(dataset);
        let encoded = preprocessor.encode_dataset(dataset)?;
        let scaler = StandardScaler::fit(&encoded.x)?;
        let fields = preprocessor
            .columns()
            .iter()
            .map(|column| FieldSpec {
                name: column.name.clone(),
                kind: column.kind,
                options: match column.kind {
                    ColumnKind::Categorical => preprocessor
                        .encoder(&column.name)
                        .map(|encoder| encoder.classes().to_vec())
                        .unwrap_or_default(),
                    ColumnKind::Level => LEVEL_RANGE.map(|level| level.to_string()).collect(),
                    ColumnKind::Continuous => Vec::new(),
                },
            })
            .collect();
        Ok(Self {
            model,
            preprocessor,
            scaler,
            fields,
            drift,
        })
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Set when the dataset differs from the one the model was trained on.
    pub fn drift(&self) -> Option<&FingerprintMismatch> {
        self.drift.as_ref()
    }

    pub fn model(&self) -> &ScoreModel {
        &self.model
    }

    /// Validate one form submission and predict its score.
    pub fn predict(&self, inputs: &[String]) -> Result<f64, PredictionError> {
        if inputs.len() != self.fields.len() {
            return Err(PredictionError::MissingField {
                expected: self.fields.len(),
                found: inputs.len(),
            });
        }
        let values = self
            .fields
            .iter()
            .zip(inputs)
            .map(|(field, input)| self.parse_field(field, input.trim()))
            .collect::<Result<Vec<_>, _>>()?;
        let encoded = self.preprocessor.encode_values(&values)?;
        let scaled = self.scaler.transform_row(&encoded)?;
        let score = self.model.predict(&scaled)?;
        tracing::info!("Predicted assessment score {score:.2}");
        Ok(score)
    }

    fn parse_field(&self, field: &FieldSpec, input: &str) -> Result<RawValue, PredictionError> {
        match field.kind {
            ColumnKind::Categorical => {
                if field.options.iter().any(|option| option == input) {
                    Ok(RawValue::Category(input.to_string()))
                } else {
                    Err(PredictionError::InvalidCategory {
                        column: field.name.clone(),
                        value: input.to_string(),
                    })
                }
            }
            ColumnKind::Level => input
                .parse::<i64>()
                .map(|level| RawValue::Number(level as f64))
                .map_err(|_| PredictionError::InvalidInteger {
                    column: field.name.clone(),
                    value: input.to_string(),
                }),
            ColumnKind::Continuous => input
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(RawValue::Number)
                .ok_or_else(|| PredictionError::InvalidNumber {
                    column: field.name.clone(),
                    value: input.to_string(),
                }),
        }
    }
}
