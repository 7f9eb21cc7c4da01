use std::collections::BTreeMap;

use thiserror::Error;

use crate::dataset::{ColumnKind, Dataset, FeatureColumn, RawValue, StudentRecord};
use crate::ml::encoding::LabelEncoder;

/// Errors raised while turning raw values into numeric feature rows.
#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    #[error("Unknown value {value:?} for {column}")]
    UnknownCategory { column: String, value: String },
    #[error("Column {column} holds the wrong kind of value")]
    KindMismatch { column: String },
    #[error("Expected {expected} feature values but got {found}")]
    Width { expected: usize, found: usize },
}

/// Numeric view of a dataset, unscaled.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedDataset {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<f64>,
}

/// Label encoders for every categorical column, fit on a whole dataset.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    columns: Vec<FeatureColumn>,
    encoders: BTreeMap<usize, LabelEncoder>,
}

impl Preprocessor {
    /// Fit one encoder per categorical column over every row of `dataset`.
    pub fn fit(dataset: &Dataset) -> Self {
        let encoders = dataset
            .columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.kind == ColumnKind::Categorical)
            .map(|(idx, _)| (idx, LabelEncoder::fit(dataset.category_values(idx))))
            .collect();
        Self {
            columns: dataset.columns.clone(),
            encoders,
        }
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    /// Encoder for a categorical column, by name.
    pub fn encoder(&self, column: &str) -> Option<&LabelEncoder> {
        let idx = self.columns.iter().position(|c| c.name == column)?;
        self.encoders.get(&idx)
    }

    /// Encode one row of raw values aligned with [`Self::columns`].
    pub fn encode_values(&self, values: &[RawValue]) -> Result<Vec<f64>, EncodeError> {
        if values.len() != self.columns.len() {
            return Err(EncodeError::Width {
                expected: self.columns.len(),
                found: values.len(),
            });
        }
        self.columns
            .iter()
            .zip(values)
            .enumerate()
            .map(|(idx, (column, value))| match (column.kind, value) {
                (ColumnKind::Categorical, RawValue::Category(text)) => self
                    .encoders
                    .get(&idx)
                    .and_then(|encoder| encoder.encode(text))
                    .map(|code| code as f64)
                    .ok_or_else(|| EncodeError::UnknownCategory {
                        column: column.name.clone(),
                        value: text.clone(),
                    }),
                (ColumnKind::Level | ColumnKind::Continuous, RawValue::Number(number)) => {
                    Ok(*number)
                }
                _ => Err(EncodeError::KindMismatch {
                    column: column.name.clone(),
                }),
            })
            .collect()
    }

    pub fn encode_record(&self, record: &StudentRecord) -> Result<Vec<f64>, EncodeError> {
        self.encode_values(&record.features)
    }

    /// Encode every record of `dataset`, keeping row order.
    pub fn encode_dataset(&self, dataset: &Dataset) -> Result<EncodedDataset, EncodeError> {
        let x = dataset
            .records
            .iter()
            .map(|record| self.encode_record(record))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EncodedDataset {
            x,
            y: dataset.targets(),
        })
    }
}
