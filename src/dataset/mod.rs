//! Student dataset: column schema and CSV loading.
//!
//! Every column other than [`NAME_COLUMN`] and [`TARGET_COLUMN`] is a model
//! feature. Feature order is the CSV header order, which is the order the
//! forest is fit on and the order the prediction form renders.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod loader;

pub use loader::{Dataset, DatasetError, StudentRecord, load_dataset, parse_dataset};

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Identifier column, excluded from modeling.
pub const NAME_COLUMN: &str = "Name";

/// Regression target column.
pub const TARGET_COLUMN: &str = "Assessment Score";

/// Columns holding free-form category strings.
pub const CATEGORICAL_COLUMNS: [&str; 8] = [
    "Gender",
    "Country",
    "State",
    "City",
    "Parent Occupation",
    "Earning Class",
    "Course Name",
    "Material Name",
];

/// Small-integer coded columns offered as dropdowns in the form.
pub const LEVEL_COLUMNS: [&str; 3] = ["Material Level", "Level of Student", "Level of Course"];

/// Values offered for level columns.
pub const LEVEL_RANGE: RangeInclusive<i64> = 1..=12;

/// How a feature column is encoded and edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// String category, label-encoded to its sorted index.
    Categorical,
    /// Integer level in [`LEVEL_RANGE`].
    Level,
    /// Any other numeric value.
    Continuous,
}

impl ColumnKind {
    /// Classify a header by name.
    pub fn for_header(name: &str) -> Self {
        if CATEGORICAL_COLUMNS.contains(&name) {
            ColumnKind::Categorical
        } else if LEVEL_COLUMNS.contains(&name) {
            ColumnKind::Level
        } else {
            ColumnKind::Continuous
        }
    }
}

/// A named feature column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureColumn {
    pub name: String,
    pub kind: ColumnKind,
}

impl FeatureColumn {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = ColumnKind::for_header(&name);
        Self { name, kind }
    }
}

/// One raw feature value as read from the CSV.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Category(String),
    Number(f64),
}
