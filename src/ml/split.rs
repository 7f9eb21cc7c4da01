//! Seeded train/test row split.

use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SplitError {
    #[error("Test fraction must be in (0, 1), got {0}")]
    InvalidFraction(f64),
    #[error("{rows} rows cannot be split into non-empty train and test sets at fraction {fraction}")]
    TooFewRows { rows: usize, fraction: f64 },
}

/// Row indices for each side of the split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..rows` with `seed`; the first `ceil(rows * test_fraction)`
/// indices form the test set and the remainder the training set.
pub fn train_test_split(
    rows: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<SplitIndices, SplitError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(SplitError::InvalidFraction(test_fraction));
    }
    let n_test = (rows as f64 * test_fraction).ceil() as usize;
    if n_test == 0 || n_test >= rows {
        return Err(SplitError::TooFewRows {
            rows,
            fraction: test_fraction,
        });
    }

    let mut indices: Vec<usize> = (0..rows).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let train = indices.split_off(n_test);
    Ok(SplitIndices {
        train,
        test: indices,
    })
}

/// Gather the rows at `indices`.
pub fn take_rows<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().map(|&idx| values[idx].clone()).collect()
}
