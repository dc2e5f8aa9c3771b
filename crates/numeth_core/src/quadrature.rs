//! Composite Newton-Cotes rules on a uniform grid.
//!
//! The grid is given either as a number of subdivisions `n` or as a step
//! size `h`, never both. A step size is converted to `n = floor((b - a) / h)`
//! (snapping to the nearest integer when the quotient is within rounding of
//! one) and `h` is then recomputed so the last node lands exactly on `b`.

use crate::error::{NumericError, Result};
use serde::{Deserialize, Serialize};

/// Relative slack when turning `(b - a) / h` into a subdivision count.
const SNAP_TOLERANCE: f64 = 1e-9;

/// Largest subdivision count a step size may imply. Smaller steps are
/// rejected with [`NumericError::InvalidStepSize`].
pub const MAX_SUBDIVISIONS: usize = 1_000_000_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepSettings {
    pub subdivisions: Option<usize>,
    pub step_size: Option<f64>,
}

impl StepSettings {
    pub fn subdivisions(n: usize) -> Self {
        Self {
            subdivisions: Some(n),
            step_size: None,
        }
    }

    pub fn step_size(h: f64) -> Self {
        Self {
            subdivisions: None,
            step_size: Some(h),
        }
    }

    /// Resolves the grid over `[a, b]` into `(n, h)` with `a + n·h == b`.
    pub fn resolve(&self, a: f64, b: f64) -> Result<(usize, f64)> {
        if !a.is_finite() || !b.is_finite() {
            return Err(NumericError::InvalidInput(format!(
                "integration limits must be finite, got [{a}, {b}]"
            )));
        }
        let n = match (self.subdivisions, self.step_size) {
            (None, None) => return Err(NumericError::MissingStepParameter),
            (Some(_), Some(_)) => return Err(NumericError::ConflictingStepParameters),
            (Some(0), None) => {
                return Err(NumericError::InvalidSetting(
                    "number of subdivisions must be at least 1".to_string(),
                ))
            }
            (Some(n), None) => n,
            (None, Some(h)) => {
                if !h.is_finite() || h == 0.0 {
                    return Err(NumericError::InvalidStepSize { h });
                }
                let ratio = (b - a) / h;
                let nearest = ratio.round();
                let n = if (ratio - nearest).abs() <= SNAP_TOLERANCE * nearest.abs().max(1.0) {
                    nearest
                } else {
                    ratio.floor()
                };
                if n < 1.0 || n > MAX_SUBDIVISIONS as f64 {
                    return Err(NumericError::InvalidStepSize { h });
                }
                n as usize
            }
        };
        Ok((n, (b - a) / n as f64))
    }
}

/// Composite trapezoidal rule `h·(f(a)/2 + Σ f(a + i·h) + f(b)/2)`.
pub fn trapezoidal<F>(f: &F, a: f64, b: f64, steps: &StepSettings) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    let (n, h) = steps.resolve(a, b)?;
    let interior: f64 = (1..n).map(|i| f(a + i as f64 * h)).sum();
    Ok(h * (0.5 * f(a) + interior + 0.5 * f(b)))
}

/// Composite Simpson's 1/3 rule. Requires an even number of subdivisions.
pub fn simpson_one_third<F>(f: &F, a: f64, b: f64, steps: &StepSettings) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    let (n, h) = steps.resolve(a, b)?;
    if n % 2 != 0 {
        return Err(NumericError::OddSubdivision { n });
    }
    let odd: f64 = (1..n).step_by(2).map(|i| f(a + i as f64 * h)).sum();
    let even: f64 = (2..n).step_by(2).map(|i| f(a + i as f64 * h)).sum();
    Ok(h / 3.0 * (f(a) + 4.0 * odd + 2.0 * even + f(b)))
}
