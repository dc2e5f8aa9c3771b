//! Newton divided-difference interpolation.

use crate::error::{NumericError, Result};
use nalgebra::{DMatrix, DVector};
use serde::Serialize;

/// Lower-triangular divided-difference table over distinct nodes.
///
/// Column 0 holds the sample values and
/// `t[i][j] = (t[i][j-1] - t[i-1][j-1]) / (x[i] - x[i-j])`.
/// Entries above the diagonal are zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DividedDifferences {
    x: Vec<f64>,
    table: DMatrix<f64>,
}

impl DividedDifferences {
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(NumericError::DimensionMismatch {
                context: "sample values",
                expected: x.len(),
                got: y.len(),
            });
        }
        if x.is_empty() {
            return Err(NumericError::EmptyInput("no interpolation nodes"));
        }
        if let Some(bad) = x.iter().chain(y).find(|v| !v.is_finite()) {
            return Err(NumericError::InvalidInput(format!(
                "interpolation data contains a non-finite value ({bad})"
            )));
        }
        for second in 1..x.len() {
            if let Some(first) = (0..second).find(|&first| x[first] == x[second]) {
                return Err(NumericError::DuplicateAbscissa {
                    first,
                    second,
                    x: x[second],
                });
            }
        }

        let n = x.len();
        let mut table = DMatrix::zeros(n, n);
        table.set_column(0, &DVector::from_column_slice(y));
        for j in 1..n {
            for i in j..n {
                table[(i, j)] = (table[(i, j - 1)] - table[(i - 1, j - 1)]) / (x[i] - x[i - j]);
            }
        }

        Ok(Self {
            x: x.to_vec(),
            table,
        })
    }

    pub fn table(&self) -> &DMatrix<f64> {
        &self.table
    }

    pub fn nodes(&self) -> &[f64] {
        &self.x
    }

    /// Degree of the interpolating polynomial (number of nodes minus one).
    pub fn degree(&self) -> usize {
        self.x.len() - 1
    }

    /// Newton-form coefficients `f[x0], f[x0,x1], …`, i.e. the table diagonal.
    pub fn coefficients(&self) -> Vec<f64> {
        self.table.diagonal().iter().copied().collect()
    }

    /// Evaluates the interpolating polynomial at `t` by nested multiplication.
    pub fn evaluate(&self, t: f64) -> f64 {
        let n = self.x.len();
        let mut acc = self.table[(n - 1, n - 1)];
        for k in (0..n - 1).rev() {
            acc = acc * (t - self.x[k]) + self.table[(k, k)];
        }
        acc
    }
}

/// Shorthand for `DividedDifferences::new(x, y)` returning just the table.
pub fn divided_difference_table(x: &[f64], y: &[f64]) -> Result<DMatrix<f64>> {
    Ok(DividedDifferences::new(x, y)?.table)
}
