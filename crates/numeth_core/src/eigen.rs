use crate::convergence::{
    history_with_budget, inf_norm, ConvergenceResult, Termination,
};
use crate::error::{validate_budget, NumericError, Result};
use crate::linear_system::ensure_square;
use log::{debug, info};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerSettings {
    pub max_iterations: usize,
    pub tolerance: f64,
    pub verbose: bool,
}

impl Default for PowerSettings {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-6,
            verbose: false,
        }
    }
}

/// Dominant eigenpair estimate. The eigenvector is scaled so that its
/// largest-magnitude entry is exactly 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EigenEstimate {
    pub eigenvalue: f64,
    pub eigenvector: DVector<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EigenIterate {
    pub iteration: usize,
    /// Normalizing entry of `A·x` at this iteration; `None` for the starting
    /// vector.
    pub eigenvalue: Option<f64>,
    pub eigenvector: DVector<f64>,
    /// `‖x_k − x_{k−1}‖∞`; `None` when normalization was impossible.
    pub change: Option<f64>,
}

pub type EigenResult = ConvergenceResult<EigenEstimate, EigenIterate>;

/// Index of the first entry with the largest magnitude.
fn dominant_index(v: &DVector<f64>) -> usize {
    let mut best = 0;
    for i in 1..v.len() {
        if v[i].abs() > v[best].abs() {
            best = i;
        }
    }
    best
}

/// Power iteration for the dominant eigenvalue of a square matrix.
///
/// Each step forms `y = A·x` and divides by the entry of `y` with the
/// largest magnitude. That entry is the eigenvalue estimate. Iteration stops
/// when consecutive normalized vectors differ by less than the tolerance in
/// the infinity norm, or with [`Termination::ZeroNormalizer`] if `A·x`
/// vanishes. The history opens with `x0` as iteration 0.
pub fn power_method(
    a: &DMatrix<f64>,
    x0: &DVector<f64>,
    settings: PowerSettings,
) -> Result<EigenResult> {
    validate_budget(settings.max_iterations, Some(settings.tolerance))?;
    let n = ensure_square(a)?;
    if x0.len() != n {
        return Err(NumericError::DimensionMismatch {
            context: "initial vector",
            expected: n,
            got: x0.len(),
        });
    }
    if let Some(bad) = x0.iter().find(|v| !v.is_finite()) {
        return Err(NumericError::InvalidInput(format!(
            "initial vector contains a non-finite entry ({bad})"
        )));
    }

    let mut x = x0.clone();
    let mut eigenvalue = 0.0;
    let mut history = history_with_budget(settings.max_iterations);
    history.push(EigenIterate {
        iteration: 0,
        eigenvalue: None,
        eigenvector: x.clone(),
        change: None,
    });

    for k in 1..=settings.max_iterations {
        let y = a * &x;
        let mu = y[dominant_index(&y)];

        if mu == 0.0 {
            debug!("power method: A·x vanished at iteration {k}");
            history.push(EigenIterate {
                iteration: k,
                eigenvalue: Some(0.0),
                eigenvector: x.clone(),
                change: None,
            });
            return Ok(ConvergenceResult {
                estimate: EigenEstimate {
                    eigenvalue: 0.0,
                    eigenvector: x,
                },
                iterations: k,
                termination: Termination::ZeroNormalizer,
                history,
            });
        }

        let next = y / mu;
        let change = inf_norm(&(&x - &next));
        x = next;
        eigenvalue = mu;

        if settings.verbose {
            info!(
                "power {k:4}  eigenvalue={mu:.6}  change={change:.6e}  x={:?}",
                x.as_slice()
            );
        }
        history.push(EigenIterate {
            iteration: k,
            eigenvalue: Some(eigenvalue),
            eigenvector: x.clone(),
            change: Some(change),
        });

        if change < settings.tolerance {
            debug!("power method: converged after {k} iterations");
            return Ok(ConvergenceResult {
                estimate: EigenEstimate {
                    eigenvalue,
                    eigenvector: x,
                },
                iterations: k,
                termination: Termination::Converged,
                history,
            });
        }
    }

    debug!(
        "power method: budget of {} iterations exhausted",
        settings.max_iterations
    );
    Ok(ConvergenceResult {
        estimate: EigenEstimate {
            eigenvalue,
            eigenvector: x,
        },
        iterations: settings.max_iterations,
        termination: Termination::IterationLimit,
        history,
    })
}
