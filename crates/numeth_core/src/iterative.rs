//! Stationary iterative solvers: Jacobi, Gauss-Seidel and SOR.
//!
//! All three share one driver. Each method only supplies its sweep, which
//! turns the previous iterate into the next one.

use crate::convergence::{
    history_with_budget, inf_norm, ConvergenceResult, IterationRecord, IterativeResult,
    Termination,
};
use crate::error::{validate_budget, NumericError, Result};
use crate::linear_system::LinearSystem;
use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

/// Early-exit tolerance used by Gauss-Seidel when none is configured.
pub const GAUSS_SEIDEL_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct IterativeSettings {
    pub max_iterations: usize,
    /// Stop once `‖x_k − x_{k−1}‖∞` drops below this value. Jacobi and SOR
    /// run the full budget when unset.
    pub tolerance: Option<f64>,
    pub verbose: bool,
}

impl Default for IterativeSettings {
    fn default() -> Self {
        Self {
            max_iterations: 25,
            tolerance: None,
            verbose: false,
        }
    }
}

fn initial_iterate(system: &LinearSystem, x0: Option<&DVector<f64>>) -> Result<DVector<f64>> {
    let n = system.dim();
    let a = system.matrix();
    if let Some(index) = (0..n).find(|&i| a[(i, i)] == 0.0) {
        return Err(NumericError::ZeroDiagonal { index });
    }
    match x0 {
        Some(x0) if x0.len() != n => Err(NumericError::DimensionMismatch {
            context: "initial guess",
            expected: n,
            got: x0.len(),
        }),
        Some(x0) => Ok(x0.clone()),
        None => Ok(DVector::zeros(n)),
    }
}

fn iterate<S>(
    method: &str,
    system: &LinearSystem,
    mut x: DVector<f64>,
    settings: &IterativeSettings,
    tolerance: Option<f64>,
    sweep: S,
) -> IterativeResult
where
    S: Fn(&DMatrix<f64>, &DVector<f64>, &DVector<f64>, &mut DVector<f64>),
{
    let mut history = history_with_budget(settings.max_iterations);
    history.push(IterationRecord {
        iteration: 0,
        residual: system.residual_norm(&x),
        x: x.clone(),
    });

    for k in 1..=settings.max_iterations {
        let previous = x.clone();
        sweep(system.matrix(), system.rhs(), &previous, &mut x);

        let change = inf_norm(&(&x - &previous));
        let residual = system.residual_norm(&x);
        if settings.verbose {
            info!(
                "{method} {k:4}  change={change:.6e}  residual={residual:.6e}  x={:?}",
                x.as_slice()
            );
        }
        history.push(IterationRecord {
            iteration: k,
            x: x.clone(),
            residual,
        });

        if let Some(tol) = tolerance {
            if change < tol {
                debug!("{method}: converged after {k} sweeps");
                return ConvergenceResult {
                    estimate: x,
                    iterations: k,
                    termination: Termination::Converged,
                    history,
                };
            }
        }
    }

    debug!(
        "{method}: ran {} sweeps without meeting a tolerance",
        settings.max_iterations
    );
    ConvergenceResult {
        estimate: x,
        iterations: settings.max_iterations,
        termination: Termination::IterationLimit,
        history,
    }
}

/// Jacobi iteration. Every component of the new iterate is computed from
/// the previous iterate only.
///
/// Without a configured tolerance it performs exactly `max_iterations`
/// sweeps and reports [`Termination::IterationLimit`].
pub fn jacobi(
    system: &LinearSystem,
    x0: Option<&DVector<f64>>,
    settings: IterativeSettings,
) -> Result<IterativeResult> {
    validate_budget(settings.max_iterations, settings.tolerance)?;
    let x = initial_iterate(system, x0)?;

    Ok(iterate(
        "jacobi",
        system,
        x,
        &settings,
        settings.tolerance,
        |a, b, previous, x| {
            for i in 0..x.len() {
                let s: f64 = (0..x.len())
                    .filter(|&j| j != i)
                    .map(|j| a[(i, j)] * previous[j])
                    .sum();
                x[i] = (b[i] - s) / a[(i, i)];
            }
        },
    ))
}

/// Gauss-Seidel iteration. Components are updated in place, so each uses the
/// values already refreshed during the same sweep.
///
/// Stops early once the update falls below `settings.tolerance`, or
/// [`GAUSS_SEIDEL_TOLERANCE`] when unset.
pub fn gauss_seidel(
    system: &LinearSystem,
    x0: Option<&DVector<f64>>,
    settings: IterativeSettings,
) -> Result<IterativeResult> {
    validate_budget(settings.max_iterations, settings.tolerance)?;
    let x = initial_iterate(system, x0)?;
    let tolerance = settings.tolerance.unwrap_or(GAUSS_SEIDEL_TOLERANCE);

    Ok(iterate(
        "gauss-seidel",
        system,
        x,
        &settings,
        Some(tolerance),
        |a, b, _previous, x| {
            for i in 0..x.len() {
                let s: f64 = (0..x.len())
                    .filter(|&j| j != i)
                    .map(|j| a[(i, j)] * x[j])
                    .sum();
                x[i] = (b[i] - s) / a[(i, i)];
            }
        },
    ))
}

/// Successive over-relaxation with parameter `omega`.
///
/// Each component blends its previous value with the Gauss-Seidel update:
/// `x_i ← (1 − ω)·x_i + ω·gs_i`. `omega` must lie strictly inside `(0, 2)`;
/// `omega = 1` is Gauss-Seidel.
pub fn sor(
    system: &LinearSystem,
    x0: Option<&DVector<f64>>,
    omega: f64,
    settings: IterativeSettings,
) -> Result<IterativeResult> {
    if !(omega > 0.0 && omega < 2.0) {
        return Err(NumericError::InvalidRelaxationParameter { omega });
    }
    validate_budget(settings.max_iterations, settings.tolerance)?;
    let x = initial_iterate(system, x0)?;

    Ok(iterate(
        "sor",
        system,
        x,
        &settings,
        settings.tolerance,
        |a, b, _previous, x| {
            for i in 0..x.len() {
                let s: f64 = (0..x.len())
                    .filter(|&j| j != i)
                    .map(|j| a[(i, j)] * x[j])
                    .sum();
                x[i] = (1.0 - omega) * x[i] + omega * (b[i] - s) / a[(i, i)];
            }
        },
    ))
}
