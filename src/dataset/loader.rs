use std::path::{Path, PathBuf};

use thiserror::Error;

use super::{
    CATEGORICAL_COLUMNS, ColumnKind, FeatureColumn, NAME_COLUMN, RawValue, TARGET_COLUMN,
};

/// Errors raised while reading the student dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The file could not be read.
    #[error("Failed to read dataset {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The CSV itself is malformed (bad quoting, ragged rows, bad header).
    #[error("Malformed CSV in {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
    /// A required column is absent from the header.
    #[error("Dataset {path} is missing required column {column:?}")]
    MissingColumn { path: PathBuf, column: String },
    /// The same header appears more than once.
    #[error("Dataset {path} has duplicate column {column:?}")]
    DuplicateColumn { path: PathBuf, column: String },
    /// A numeric cell does not hold a finite number.
    #[error("{path} line {line}, column {column:?}: {value:?} is not a number")]
    InvalidNumber {
        path: PathBuf,
        line: u64,
        column: String,
        value: String,
    },
    /// A categorical cell is blank.
    #[error("{path} line {line}, column {column:?}: empty category")]
    EmptyCategory {
        path: PathBuf,
        line: u64,
        column: String,
    },
    /// The file has a header but no data rows.
    #[error("Dataset {path} has no rows")]
    Empty { path: PathBuf },
}

/// One parsed student row.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    /// Value of the `Name` column, if the dataset has one.
    pub name: Option<String>,
    /// Feature values aligned with [`Dataset::columns`].
    pub features: Vec<RawValue>,
    /// Assessment score.
    pub score: f64,
}

/// The loaded student dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Source path, used for error context.
    pub path: PathBuf,
    /// blake3 hex digest of the file bytes.
    pub fingerprint: String,
    /// Feature columns in header order.
    pub columns: Vec<FeatureColumn>,
    pub records: Vec<StudentRecord>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of a feature column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }

    /// Feature column names in order.
    pub fn feature_names(&self) -> Vec<String> {
        self.columns.iter().map(|column| column.name.clone()).collect()
    }

    /// Target values in row order.
    pub fn targets(&self) -> Vec<f64> {
        self.records.iter().map(|record| record.score).collect()
    }

    /// Category strings of one column in row order.
    pub fn category_values(&self, column_idx: usize) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .filter_map(move |record| match record.features.get(column_idx) {
                Some(RawValue::Category(value)) => Some(value.as_str()),
                _ => None,
            })
    }
}

/// Load and parse the dataset at `path`.
pub fn load_dataset(path: &Path) -> Result<Dataset, DatasetError> {
    let bytes = std::fs::read(path).map_err(|source| DatasetError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = parse_dataset(&bytes, path)?;
    tracing::info!(
        "Loaded {} rows with {} features from {}",
        dataset.len(),
        dataset.columns.len(),
        path.display()
    );
    Ok(dataset)
}

/// Parse CSV bytes; `path` is only used for error context.
pub fn parse_dataset(bytes: &[u8], path: &Path) -> Result<Dataset, DatasetError> {
    let csv_error = |source| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();
    let layout = HeaderLayout::resolve(&headers, path)?;

    let mut records = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let row = row.map_err(csv_error)?;
        let line = row
            .position()
            .map(|pos| pos.line())
            .unwrap_or(idx as u64 + 2);
        records.push(layout.parse_row(&row, line, path)?);
    }
    if records.is_empty() {
        return Err(DatasetError::Empty {
            path: path.to_path_buf(),
        });
    }

    Ok(Dataset {
        path: path.to_path_buf(),
        fingerprint: blake3::hash(bytes).to_hex().to_string(),
        columns: layout.columns,
        records,
    })
}

/// Where each logical column sits in the CSV header.
struct HeaderLayout {
    name_idx: Option<usize>,
    target_idx: usize,
    feature_idx: Vec<usize>,
    columns: Vec<FeatureColumn>,
}

impl HeaderLayout {
    fn resolve(headers: &[String], path: &Path) -> Result<Self, DatasetError> {
        for (idx, header) in headers.iter().enumerate() {
            if headers[..idx].contains(header) {
                return Err(DatasetError::DuplicateColumn {
                    path: path.to_path_buf(),
                    column: header.clone(),
                });
            }
        }
        let missing = |column: &str| DatasetError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        };
        let target_idx = headers
            .iter()
            .position(|header| header == TARGET_COLUMN)
            .ok_or_else(|| missing(TARGET_COLUMN))?;
        if let Some(absent) = CATEGORICAL_COLUMNS
            .iter()
            .copied()
            .find(|column| !headers.iter().any(|header| header == column))
        {
            return Err(missing(absent));
        }
        let name_idx = headers.iter().position(|header| header == NAME_COLUMN);

        let mut feature_idx = Vec::new();
        let mut columns = Vec::new();
        for (idx, header) in headers.iter().enumerate() {
            if idx == target_idx || Some(idx) == name_idx {
                continue;
            }
            feature_idx.push(idx);
            columns.push(FeatureColumn::new(header.clone()));
        }
        Ok(Self {
            name_idx,
            target_idx,
            feature_idx,
            columns,
        })
    }

    fn parse_row(
        &self,
        row: &csv::StringRecord,
        line: u64,
        path: &Path,
    ) -> Result<StudentRecord, DatasetError> {
        let cell = |idx: usize| row.get(idx).unwrap_or_default();
        let mut features = Vec::with_capacity(self.columns.len());
        for (column, &idx) in self.columns.iter().zip(&self.feature_idx) {
            let raw = cell(idx);
            let value = match column.kind {
                ColumnKind::Categorical => {
                    if raw.is_empty() {
                        return Err(DatasetError::EmptyCategory {
                            path: path.to_path_buf(),
                            line,
                            column: column.name.clone(),
                        });
                    }
                    RawValue::Category(raw.to_string())
                }
                ColumnKind::Level | ColumnKind::Continuous => {
                    RawValue::Number(parse_number(raw, &column.name, line, path)?)
                }
            };
            features.push(value);
        }
        let score = parse_number(cell(self.target_idx), TARGET_COLUMN, line, path)?;
        Ok(StudentRecord {
            name: self.name_idx.map(|idx| cell(idx).to_string()),
            features,
            score,
        })
    }
}

fn parse_number(raw: &str, column: &str, line: u64, path: &Path) -> Result<f64, DatasetError> {
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| DatasetError::InvalidNumber {
            path: path.to_path_buf(),
            line,
            column: column.to_string(),
            value: raw.to_string(),
        })
}
