//! Fixed-step explicit ODE marching.
//!
//! Scalar problems `y' = f(t, y)` go through [`euler`] and [`rk4`]; systems
//! implement [`DynamicalSystem`] and are marched with any [`Steppable`] via
//! [`integrate_system`]. Grid times are computed as `t0 + i·h` rather than
//! accumulated, so long runs do not drift.

use crate::error::{NumericError, Result};
use crate::quadrature::StepSettings;
use crate::solvers::{Euler, Rk4};
use crate::traits::{DynamicalSystem, ScalarOde, Steppable};
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OdeMethod {
    Euler,
    Rk4,
}

/// Grid points `t_0..t_n` and the scalar solution values at each.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OdeSolution {
    pub t: Vec<f64>,
    pub y: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemTrajectory {
    pub t: Vec<f64>,
    pub states: Vec<Vec<f64>>,
}

fn validate_grid(t0: f64, h: f64) -> Result<()> {
    if !h.is_finite() || h == 0.0 {
        return Err(NumericError::InvalidStepSize { h });
    }
    if !t0.is_finite() {
        return Err(NumericError::InvalidInput(format!(
            "initial time must be finite, got {t0}"
        )));
    }
    Ok(())
}

/// Marches `system` from `(t0, y0)` for `steps` steps of size `h`.
///
/// The returned trajectory has `steps + 1` entries, the first being the
/// initial condition.
pub fn integrate_system<S, D>(
    stepper: &mut S,
    system: &D,
    t0: f64,
    y0: &[f64],
    h: f64,
    steps: usize,
) -> Result<SystemTrajectory>
where
    S: Steppable,
    D: DynamicalSystem,
{
    validate_grid(t0, h)?;
    if y0.len() != system.dimension() {
        return Err(NumericError::DimensionMismatch {
            context: "initial state",
            expected: system.dimension(),
            got: y0.len(),
        });
    }
    if stepper.dimension() != system.dimension() {
        return Err(NumericError::DimensionMismatch {
            context: "stepper",
            expected: system.dimension(),
            got: stepper.dimension(),
        });
    }

    let mut t_values = Vec::with_capacity(steps + 1);
    let mut states = Vec::with_capacity(steps + 1);
    let mut state = y0.to_vec();
    t_values.push(t0);
    states.push(state.clone());

    for i in 1..=steps {
        let mut t = t0 + (i - 1) as f64 * h;
        stepper.step(system, &mut t, &mut state, h);
        t_values.push(t0 + i as f64 * h);
        states.push(state.clone());
    }

    debug!("integrated {steps} steps of size {h} from t = {t0}");
    Ok(SystemTrajectory {
        t: t_values,
        states,
    })
}

fn integrate_scalar<S, F>(
    stepper: &mut S,
    f: F,
    t0: f64,
    y0: f64,
    h: f64,
    steps: usize,
) -> Result<OdeSolution>
where
    S: Steppable,
    F: Fn(f64, f64) -> f64,
{
    if !y0.is_finite() {
        return Err(NumericError::InvalidInput(format!(
            "initial value must be finite, got {y0}"
        )));
    }
    let trajectory = integrate_system(stepper, &ScalarOde::new(f), t0, &[y0], h, steps)?;
    Ok(OdeSolution {
        t: trajectory.t,
        y: trajectory.states.into_iter().map(|s| s[0]).collect(),
    })
}

/// Forward Euler on `y' = f(t, y)`, `y(t0) = y0`.
pub fn euler<F>(f: F, t0: f64, y0: f64, h: f64, steps: usize) -> Result<OdeSolution>
where
    F: Fn(f64, f64) -> f64,
{
    integrate_scalar(&mut Euler::new(1), f, t0, y0, h, steps)
}

/// Classic fourth-order Runge-Kutta on `y' = f(t, y)`, `y(t0) = y0`.
pub fn rk4<F>(f: F, t0: f64, y0: f64, h: f64, steps: usize) -> Result<OdeSolution>
where
    F: Fn(f64, f64) -> f64,
{
    integrate_scalar(&mut Rk4::new(1), f, t0, y0, h, steps)
}

/// Euler from `a` to `b` on the grid described by `grid`.
pub fn euler_interval<F>(
    f: F,
    a: f64,
    b: f64,
    y0: f64,
    grid: &StepSettings,
) -> Result<OdeSolution>
where
    F: Fn(f64, f64) -> f64,
{
    let (n, h) = grid.resolve(a, b)?;
    euler(f, a, y0, h, n)
}

/// RK4 from `a` to `b` on the grid described by `grid`.
pub fn rk4_interval<F>(
    f: F,
    a: f64,
    b: f64,
    y0: f64,
    grid: &StepSettings,
) -> Result<OdeSolution>
where
    F: Fn(f64, f64) -> f64,
{
    let (n, h) = grid.resolve(a, b)?;
    rk4(f, a, y0, h, n)
}

/// Dispatches on `method` for callers that pick the integrator at runtime.
pub fn solve<F>(
    method: OdeMethod,
    f: F,
    t0: f64,
    y0: f64,
    h: f64,
    steps: usize,
) -> Result<OdeSolution>
where
    F: Fn(f64, f64) -> f64,
{
    match method {
        OdeMethod::Euler => euler(f, t0, y0, h, steps),
        OdeMethod::Rk4 => rk4(f, t0, y0, h, steps),
    }
}
