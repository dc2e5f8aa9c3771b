//! Iteration traces and terminal outcomes shared by the iterative methods.

use crate::error::{NumericError, Result};
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

/// Why an iterative method stopped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Termination {
    /// The stopping tolerance was met.
    Converged,
    /// A supplied endpoint or initial guess is already an exact root.
    ExactRoot,
    /// The iteration budget was exhausted.
    IterationLimit,
    ZeroDerivative { x: f64 },
    EqualFunctionValues { x0: f64, x1: f64 },
    NonFinite { x: f64 },
    ZeroNormalizer,
}

impl Termination {
    pub fn is_converged(&self) -> bool {
        matches!(self, Termination::Converged | Termination::ExactRoot)
    }

    /// True for the structural failures, as opposed to running out of budget.
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            Termination::ZeroDerivative { .. }
                | Termination::EqualFunctionValues { .. }
                | Termination::NonFinite { .. }
                | Termination::ZeroNormalizer
        )
    }
}

/// Final estimate of an iterative method together with its trace.
#[derive(Debug, Clone, Serialize)]
pub struct ConvergenceResult<E, R> {
    pub estimate: E,
    pub iterations: usize,
    pub termination: Termination,
    pub history: Vec<R>,
}

impl<E, R> ConvergenceResult<E, R> {
    pub fn converged(&self) -> bool {
        self.termination.is_converged()
    }

    /// Returns the estimate when the method converged, the matching error otherwise.
    pub fn into_converged(self) -> Result<E> {
        match self.termination {
            Termination::Converged | Termination::ExactRoot => Ok(self.estimate),
            Termination::IterationLimit => Err(NumericError::NotConverged {
                iterations: self.iterations,
            }),
            Termination::ZeroDerivative { x } => Err(NumericError::ZeroDerivative { x }),
            Termination::EqualFunctionValues { x0, x1 } => {
                Err(NumericError::EqualFunctionValues { x0, x1 })
            }
            Termination::NonFinite { x } => Err(NumericError::NonFinite { x }),
            Termination::ZeroNormalizer => Err(NumericError::ZeroNormalizer),
        }
    }
}

/// One step of a scalar root finder: the point evaluated and its function value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RootIterate {
    pub iteration: usize,
    pub x: f64,
    pub fx: f64,
    /// Interval in force when `x` was evaluated (bracketing methods only).
    pub bracket: Option<(f64, f64)>,
}

/// One iterate of a vector solver. `residual` is `‖b − A·x‖∞`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterationRecord {
    pub iteration: usize,
    pub x: DVector<f64>,
    pub residual: f64,
}

pub type RootResult = ConvergenceResult<f64, RootIterate>;
pub type IterativeResult = ConvergenceResult<DVector<f64>, IterationRecord>;

/// Upper bound on the history slots reserved before a run starts. The budget
/// is only a ceiling, so larger traces grow on demand.
const HISTORY_RESERVE: usize = 1024;

pub(crate) fn history_with_budget<R>(max_iterations: usize) -> Vec<R> {
    Vec::with_capacity(max_iterations.saturating_add(1).min(HISTORY_RESERVE))
}

pub(crate) fn inf_norm(v: &DVector<f64>) -> f64 {
    v.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()))
}
