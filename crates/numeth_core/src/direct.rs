//! Direct solvers: Gaussian elimination and LU decomposition.

use crate::error::{NumericError, Result};
use crate::linear_system::{ensure_square, LinearSystem};
use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// How Gaussian elimination picks the pivot row for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PivotStrategy {
    /// First row at or below the diagonal with a nonzero entry.
    #[default]
    FirstNonZero,
    /// Row at or below the diagonal with the largest absolute entry.
    MaxMagnitude,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EliminationSettings {
    pub pivot: PivotStrategy,
    pub verbose: bool,
}

/// Outcome of Gaussian elimination. The degenerate cases are ordinary
/// results, not errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LinearSolution {
    Unique(DVector<f64>),
    /// Rank deficient with a consistent (or undetermined) right-hand side.
    NoUniqueSolution,
    /// The reduced system contains a row `0 = c` with `c != 0`.
    NoSolution,
}

impl LinearSolution {
    pub fn unique(&self) -> Option<&DVector<f64>> {
        match self {
            LinearSolution::Unique(x) => Some(x),
            _ => None,
        }
    }
}

fn select_pivot(aug: &DMatrix<f64>, col: usize, strategy: PivotStrategy) -> Option<usize> {
    let n = aug.nrows();
    match strategy {
        PivotStrategy::FirstNonZero => (col..n).find(|&row| aug[(row, col)] != 0.0),
        PivotStrategy::MaxMagnitude => {
            let mut best: Option<(usize, f64)> = None;
            for row in col..n {
                let magnitude = aug[(row, col)].abs();
                if magnitude > best.map_or(0.0, |(_, m)| m) {
                    best = Some((row, magnitude));
                }
            }
            best.map(|(row, _)| row)
        }
    }
}

/// Solves `A·x = b` by forward elimination on `[A|b]` followed by back
/// substitution.
pub fn gaussian_elimination(system: &LinearSystem, settings: EliminationSettings) -> LinearSolution {
    let n = system.dim();
    let a = system.matrix();
    let b = system.rhs();
    let mut aug = DMatrix::from_fn(n, n + 1, |i, j| if j < n { a[(i, j)] } else { b[i] });

    if settings.verbose {
        info!("augmented matrix:{aug}");
    }

    for i in 0..n.saturating_sub(1) {
        let Some(p) = select_pivot(&aug, i, settings.pivot) else {
            debug!("gaussian elimination: column {i} has no nonzero pivot");
            return LinearSolution::NoUniqueSolution;
        };
        if p != i {
            aug.swap_rows(i, p);
        }

        let pivot = aug[(i, i)];
        for k in i + 1..n {
            let m = aug[(k, i)] / pivot;
            if m == 0.0 {
                continue;
            }
            for j in i..=n {
                let upper = aug[(i, j)];
                aug[(k, j)] -= m * upper;
            }
        }

        if settings.verbose {
            info!("step {}:{aug}", i + 1);
        }
    }

    if aug[(n - 1, n - 1)] == 0.0 {
        return if aug[(n - 1, n)] == 0.0 {
            debug!("gaussian elimination: no unique solution");
            LinearSolution::NoUniqueSolution
        } else {
            debug!("gaussian elimination: inconsistent system");
            LinearSolution::NoSolution
        };
    }

    let mut x = DVector::zeros(n);
    for i in (0..n).rev() {
        let s: f64 = (i + 1..n).map(|j| aug[(i, j)] * x[j]).sum();
        x[i] = (aug[(i, n)] - s) / aug[(i, i)];
    }

    if settings.verbose {
        info!("solution:{x}");
    }
    LinearSolution::Unique(x)
}

/// Triangular factors with `A = L·U`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LuFactors {
    pub l: DMatrix<f64>,
    pub u: DMatrix<f64>,
}

impl LuFactors {
    pub fn reconstruct(&self) -> DMatrix<f64> {
        &self.l * &self.u
    }

    /// Solves `L·U·x = b` by forward then backward substitution.
    pub fn solve(&self, b: &DVector<f64>) -> Result<DVector<f64>> {
        let n = self.l.nrows();
        if b.len() != n {
            return Err(NumericError::DimensionMismatch {
                context: "right-hand side",
                expected: n,
                got: b.len(),
            });
        }

        let mut z = DVector::zeros(n);
        for i in 0..n {
            let d = self.l[(i, i)];
            if d == 0.0 {
                return Err(NumericError::SingularMatrix { index: i, value: d });
            }
            let s: f64 = (0..i).map(|k| self.l[(i, k)] * z[k]).sum();
            z[i] = (b[i] - s) / d;
        }

        let mut x = DVector::zeros(n);
        for i in (0..n).rev() {
            let d = self.u[(i, i)];
            if d == 0.0 {
                return Err(NumericError::SingularMatrix { index: i, value: d });
            }
            let s: f64 = (i + 1..n).map(|k| self.u[(i, k)] * x[k]).sum();
            x[i] = (z[i] - s) / d;
        }
        Ok(x)
    }
}

/// LU decomposition by Doolittle's method: `L` has a unit diagonal.
///
/// No row exchanges are made, so any zero pivot that would be used as a
/// divisor is reported as [`NumericError::SingularMatrix`]. A zero in the last
/// diagonal entry of `U` is not a divisor and is allowed.
pub fn lu_doolittle(a: &DMatrix<f64>) -> Result<LuFactors> {
    let n = ensure_square(a)?;
    let mut l = DMatrix::identity(n, n);
    let mut u = DMatrix::zeros(n, n);

    for i in 0..n {
        for j in i..n {
            let s: f64 = (0..i).map(|k| l[(i, k)] * u[(k, j)]).sum();
            u[(i, j)] = a[(i, j)] - s;
        }

        let pivot = u[(i, i)];
        if i + 1 < n && pivot == 0.0 {
            return Err(NumericError::SingularMatrix {
                index: i,
                value: pivot,
            });
        }

        for j in i + 1..n {
            let s: f64 = (0..i).map(|k| l[(j, k)] * u[(k, i)]).sum();
            l[(j, i)] = (a[(j, i)] - s) / pivot;
        }
    }

    Ok(LuFactors { l, u })
}

/// LU decomposition by Crout's method: `U` has a unit diagonal.
///
/// Same pivot rules as [`lu_doolittle`], applied to the diagonal of `L`.
pub fn lu_crout(a: &DMatrix<f64>) -> Result<LuFactors> {
    let n = ensure_square(a)?;
    let mut l = DMatrix::zeros(n, n);
    let mut u = DMatrix::identity(n, n);

    for i in 0..n {
        for j in i..n {
            let s: f64 = (0..i).map(|k| l[(j, k)] * u[(k, i)]).sum();
            l[(j, i)] = a[(j, i)] - s;
        }

        let pivot = l[(i, i)];
        if i + 1 < n && pivot == 0.0 {
            return Err(NumericError::SingularMatrix {
                index: i,
                value: pivot,
            });
        }

        for j in i + 1..n {
            let s: f64 = (0..i).map(|k| l[(i, k)] * u[(k, j)]).sum();
            u[(i, j)] = (a[(i, j)] - s) / pivot;
        }
    }

    Ok(LuFactors { l, u })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn system(n: usize, a: &[f64], b: &[f64]) -> LinearSystem {
        LinearSystem::from_row_slice(n, a, b).expect("valid system")
    }

    fn assert_err_contains<T: std::fmt::Debug>(result: Result<T>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn gaussian_elimination_solves_two_by_two() {
        let sys = system(2, &[2.0, 3.0, 5.0, 4.0], &[8.0, 13.0]);
        let solution = gaussian_elimination(&sys, EliminationSettings::default());
        let x = solution.unique().expect("unique solution");
        assert_relative_eq!(x[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn gaussian_elimination_swaps_zero_pivot_row() {
        let sys = system(2, &[0.0, 1.0, 1.0, 1.0], &[2.0, 3.0]);
        let solution = gaussian_elimination(&sys, EliminationSettings::default());
        assert_eq!(solution, LinearSolution::Unique(DVector::from_vec(vec![1.0, 2.0])));
    }

    #[test]
    fn gaussian_elimination_solves_three_by_three() {
        let sys = system(
            3,
            &[4.0, 1.0, 1.0, 1.0, 3.0, 1.0, 1.0, 1.0, 5.0],
            &[9.0, 10.0, 18.0],
        );
        let x = gaussian_elimination(&sys, EliminationSettings::default());
        let x = x.unique().expect("unique");
        assert_relative_eq!(x.clone(), DVector::from_vec(vec![1.0, 2.0, 3.0]), epsilon = 1e-12);
    }

    #[test]
    fn gaussian_elimination_reports_degenerate_systems() {
        let consistent = system(2, &[1.0, 2.0, 2.0, 4.0], &[3.0, 6.0]);
        assert_eq!(
            gaussian_elimination(&consistent, EliminationSettings::default()),
            LinearSolution::NoUniqueSolution
        );

        let inconsistent = system(2, &[1.0, 2.0, 2.0, 4.0], &[3.0, 7.0]);
        assert_eq!(
            gaussian_elimination(&inconsistent, EliminationSettings::default()),
            LinearSolution::NoSolution
        );

        let zero_column = system(2, &[0.0, 1.0, 0.0, 2.0], &[1.0, 2.0]);
        assert_eq!(
            gaussian_elimination(&zero_column, EliminationSettings::default()),
            LinearSolution::NoUniqueSolution
        );
    }

    #[test]
    fn pivot_strategy_changes_accuracy_on_tiny_pivot() {
        let sys = system(2, &[1e-20, 1.0, 1.0, 1.0], &[1.0, 2.0]);

        let first = gaussian_elimination(&sys, EliminationSettings::default());
        let first = first.unique().expect("unique");
        // 1e-20 is used as the divisor and x0 is lost to cancellation
        assert_eq!(first[0], 0.0);

        let settings = EliminationSettings {
            pivot: PivotStrategy::MaxMagnitude,
            verbose: false,
        };
        let robust = gaussian_elimination(&sys, settings);
        let robust = robust.unique().expect("unique");
        assert_relative_eq!(robust[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(robust[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn gaussian_elimination_single_equation() {
        let sys = system(1, &[4.0], &[2.0]);
        assert_eq!(
            gaussian_elimination(&sys, EliminationSettings::default()),
            LinearSolution::Unique(DVector::from_vec(vec![0.5]))
        );
        let sys = system(1, &[0.0], &[2.0]);
        assert_eq!(
            gaussian_elimination(&sys, EliminationSettings::default()),
            LinearSolution::NoSolution
        );
    }

    #[test]
    fn doolittle_matches_hand_factorization() {
        let a = DMatrix::from_row_slice(2, 2, &[4.0, 3.0, 6.0, 3.0]);
        let lu = lu_doolittle(&a).expect("factorization");
        assert_eq!(lu.l, DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 1.5, 1.0]));
        assert_eq!(lu.u, DMatrix::from_row_slice(2, 2, &[4.0, 3.0, 0.0, -1.5]));
        assert_eq!(lu.reconstruct(), a);
    }

    #[test]
    fn crout_matches_hand_factorization() {
        let a = DMatrix::from_row_slice(2, 2, &[4.0, 3.0, 6.0, 3.0]);
        let lu = lu_crout(&a).expect("factorization");
        assert_eq!(lu.l, DMatrix::from_row_slice(2, 2, &[4.0, 0.0, 6.0, -1.5]));
        assert_eq!(lu.u, DMatrix::from_row_slice(2, 2, &[1.0, 0.75, 0.0, 1.0]));
        assert_eq!(lu.reconstruct(), a);
    }

    #[test]
    fn factors_have_triangular_shape() {
        let a = DMatrix::from_row_slice(
            4,
            4,
            &[
                5.0, 1.0, 2.0, 0.5, 1.0, 6.0, 1.0, 2.0, 2.0, 1.0, 7.0, 1.0, 0.5, 2.0, 1.0, 8.0,
            ],
        );
        for lu in [lu_doolittle(&a).expect("doolittle"), lu_crout(&a).expect("crout")] {
            for i in 0..4 {
                for j in i + 1..4 {
                    assert_eq!(lu.l[(i, j)], 0.0);
                    assert_eq!(lu.u[(j, i)], 0.0);
                }
            }
            assert_relative_eq!(lu.reconstruct(), a.clone(), epsilon = 1e-12);
        }
        let doolittle = lu_doolittle(&a).expect("doolittle");
        let crout = lu_crout(&a).expect("crout");
        for i in 0..4 {
            assert_eq!(doolittle.l[(i, i)], 1.0);
            assert_eq!(crout.u[(i, i)], 1.0);
        }
    }

    #[test]
    fn zero_leading_pivot_is_singular() {
        let a = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        assert_eq!(
            lu_doolittle(&a),
            Err(NumericError::SingularMatrix {
                index: 0,
                value: 0.0
            })
        );
        assert_err_contains(lu_crout(&a), "pivot at index 0");
    }

    #[test]
    fn zero_interior_pivot_is_singular() {
        let a = DMatrix::from_row_slice(3, 3, &[1.0, 2.0, 3.0, 2.0, 4.0, 5.0, 1.0, 1.0, 1.0]);
        assert_err_contains(lu_doolittle(&a), "pivot at index 1");
        assert_err_contains(lu_crout(&a), "pivot at index 1");
    }

    #[test]
    fn zero_final_pivot_factorizes_but_cannot_solve() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let lu = lu_doolittle(&a).expect("singular matrix still factorizes");
        assert_eq!(lu.u[(1, 1)], 0.0);
        assert_eq!(lu.reconstruct(), a);
        assert_err_contains(
            lu.solve(&DVector::from_vec(vec![1.0, 2.0])),
            "pivot at index 1",
        );
    }

    #[test]
    fn lu_rejects_non_square() {
        let a = DMatrix::from_row_slice(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_err_contains(lu_doolittle(&a), "square");
        assert_err_contains(lu_crout(&DMatrix::zeros(0, 0)), "Empty");
    }

    #[test]
    fn lu_solve_recovers_known_solution() {
        let a = DMatrix::from_row_slice(3, 3, &[4.0, 1.0, 1.0, 1.0, 3.0, 1.0, 1.0, 1.0, 5.0]);
        let b = DVector::from_vec(vec![9.0, 10.0, 18.0]);
        let expected = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        for lu in [lu_doolittle(&a).expect("doolittle"), lu_crout(&a).expect("crout")] {
            let x = lu.solve(&b).expect("solve");
            assert_relative_eq!(x, expected.clone(), epsilon = 1e-12);
        }
    }
}
