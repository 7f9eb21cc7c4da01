//! Per-column standardization.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when fitting or applying a scaler.
#[derive(Debug, Error, PartialEq)]
pub enum ScalerError {
    #[error("Cannot fit a scaler on zero rows")]
    Empty,
    #[error("Row {row} has {found} columns but expected {expected}")]
    Width {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// Subtracts the fit-time mean and divides by the fit-time population
/// standard deviation. Constant columns keep a scale of 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Compute per-column statistics over every row of `x`.
    pub fn fit(x: &[Vec<f64>]) -> Result<Self, ScalerError> {
        let width = x.first().map(Vec::len).ok_or(ScalerError::Empty)?;
        check_widths(x, width)?;

        let n = x.len() as f64;
        let mut mean = vec![0.0f64; width];
        for row in x {
            for (acc, &v) in mean.iter_mut().zip(row) {
                *acc += v;
            }
        }
        for m in &mut mean {
            *m /= n;
        }

        let mut variance = vec![0.0f64; width];
        for row in x {
            for ((acc, &v), &m) in variance.iter_mut().zip(row).zip(&mean) {
                let d = v - m;
                *acc += d * d;
            }
        }
        let scale = variance
            .into_iter()
            .map(|sum_sq| {
                let std = (sum_sq / n).sqrt();
                if std < 10.0 * f64::EPSILON { 1.0 } else { std }
            })
            .collect();

        Ok(Self { mean, scale })
    }

    pub fn mean(&self) -> &[f64] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64] {
        &self.scale
    }

    /// Number of columns the scaler was fit on.
    pub fn width(&self) -> usize {
        self.mean.len()
    }

    /// Standardize one row.
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>, ScalerError> {
        if row.len() != self.width() {
            return Err(ScalerError::Width {
                row: 0,
                expected: self.width(),
                found: row.len(),
            });
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(&v, (&m, &s))| (v - m) / s)
            .collect())
    }

    /// Standardize every row of `x`.
    pub fn transform(&self, x: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ScalerError> {
        check_widths(x, self.width())?;
        x.iter().map(|row| self.transform_row(row)).collect()
    }
}

fn check_widths(x: &[Vec<f64>], expected: usize) -> Result<(), ScalerError> {
    match x.iter().position(|row| row.len() != expected) {
        Some(row) => Err(ScalerError::Width {
            row,
            expected,
            found: x[row].len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column_stats(x: &[Vec<f64>], col: usize) -> (f64, f64) {
        let n = x.len() as f64;
        let mean = x.iter().map(|row| row[col]).sum::<f64>() / n;
        let var = x.iter().map(|row| (row[col] - mean).powi(2)).sum::<f64>() / n;
        (mean, var)
    }

    #[test]
    fn transformed_columns_have_zero_mean_unit_variance() {
        let x = vec![
            vec![1.0, 100.0, 3.0],
            vec![2.0, 250.0, 0.0],
            vec![4.0, 175.0, 7.0],
            vec![8.0, 90.0, 1.0],
            vec![3.0, 60.0, 12.0],
        ];
        let scaler = StandardScaler::fit(&x).unwrap();
        let scaled = scaler.transform(&x).unwrap();
        for col in 0..3 {
            let (mean, var) = column_stats(&scaled, col);
            assert!(mean.abs() < 1e-9, "col {col} mean {mean}");
            assert!((var - 1.0).abs() < 1e-9, "col {col} var {var}");
        }
    }

    #[test]
    fn uses_population_standard_deviation() {
        let x = vec![vec![1.0], vec![3.0]];
        let scaler = StandardScaler::fit(&x).unwrap();
        assert_eq!(scaler.mean(), [2.0]);
        assert_eq!(scaler.scale(), [1.0]);
        assert_eq!(scaler.transform_row(&[3.0]).unwrap(), vec![1.0]);
    }

    #[test]
    fn constant_column_is_only_centred() {
        let x = vec![vec![5.0, 1.0], vec![5.0, 2.0], vec![5.0, 3.0]];
        let scaler = StandardScaler::fit(&x).unwrap();
        assert_eq!(scaler.scale()[0], 1.0);
        let scaled = scaler.transform(&x).unwrap();
        assert!(scaled.iter().all(|row| row[0] == 0.0));
    }

    #[test]
    fn single_row_scales_to_zeros() {
        let scaler = StandardScaler::fit(&[vec![4.0, -2.0]]).unwrap();
        assert_eq!(scaler.transform_row(&[4.0, -2.0]).unwrap(), vec![0.0, 0.0]);
    }

    #[test]
    fn rejects_empty_and_ragged_input() {
        assert_eq!(StandardScaler::fit(&[]), Err(ScalerError::Empty));
        let ragged = vec![vec![1.0, 2.0], vec![1.0]];
        assert_eq!(
            StandardScaler::fit(&ragged),
            Err(ScalerError::Width {
                row: 1,
                expected: 2,
                found: 1
            })
        );
        let scaler = StandardScaler::fit(&[vec![1.0, 2.0]]).unwrap();
        assert!(scaler.transform_row(&[1.0]).is_err());
    }
}
