use crate::convergence::inf_norm;
use crate::error::{NumericError, Result};
use nalgebra::{DMatrix, DVector};
use serde::Serialize;

/// A square system `A·x = b`.
///
/// Shapes are checked on construction, so every solver can assume
/// `n = rows(A) = cols(A) = len(b)` with `n >= 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearSystem {
    a: DMatrix<f64>,
    b: DVector<f64>,
}

impl LinearSystem {
    pub fn new(a: DMatrix<f64>, b: DVector<f64>) -> Result<Self> {
        let n = ensure_square(&a)?;
        if b.len() != n {
            return Err(NumericError::DimensionMismatch {
                context: "right-hand side",
                expected: n,
                got: b.len(),
            });
        }
        Ok(Self { a, b })
    }

    /// Builds the system from a row-major coefficient slice.
    pub fn from_row_slice(n: usize, a: &[f64], b: &[f64]) -> Result<Self> {
        if n == 0 {
            return Err(NumericError::EmptyInput("linear system has no unknowns"));
        }
        if a.len() != n * n {
            return Err(NumericError::DimensionMismatch {
                context: "coefficient entries",
                expected: n * n,
                got: a.len(),
            });
        }
        Self::new(
            DMatrix::from_row_slice(n, n, a),
            DVector::from_column_slice(b),
        )
    }

    pub fn dim(&self) -> usize {
        self.b.len()
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.a
    }

    pub fn rhs(&self) -> &DVector<f64> {
        &self.b
    }

    /// `‖b − A·x‖∞`
    pub fn residual_norm(&self, x: &DVector<f64>) -> f64 {
        inf_norm(&(&self.b - &self.a * x))
    }
}

/// Returns `n` for an `n×n` matrix with `n >= 1`.
pub(crate) fn ensure_square(a: &DMatrix<f64>) -> Result<usize> {
    if a.nrows() != a.ncols() {
        return Err(NumericError::NotSquare {
            rows: a.nrows(),
            cols: a.ncols(),
        });
    }
    if a.nrows() == 0 {
        return Err(NumericError::EmptyInput("matrix has no entries"));
    }
    Ok(a.nrows())
}
