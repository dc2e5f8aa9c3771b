//! Scalar root finding.
//!
//! Bracketing methods (bisection, regula falsi, Illinois) need an interval over
//! which `f` changes sign. Open methods (secant, Newton-Raphson) start from
//! guesses and may diverge, so `max_iterations` is their only guaranteed stop.
//!
//! ```
//! use numeth_core::roots::{newton_raphson, RootSettings};
//!
//! let f = |x: f64| x * x - 2.0;
//! let df = |x: f64| 2.0 * x;
//! let result = newton_raphson(&f, &df, 1.5, RootSettings::default()).unwrap();
//! assert!(result.converged());
//! assert!((result.estimate - 2.0_f64.sqrt()).abs() < 1e-7);
//! ```

use crate::convergence::{
    history_with_budget, ConvergenceResult, RootIterate, RootResult, Termination,
};
use crate::error::{validate_budget, NumericError, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RootSettings {
    pub max_iterations: usize,
    /// Bisection: bracket width. Regula falsi/Illinois: `|f(x)|`.
    /// Secant/Newton: distance between successive iterates.
    pub tolerance: f64,
    pub verbose: bool,
}

impl Default for RootSettings {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-7,
            verbose: false,
        }
    }
}

impl RootSettings {
    fn validate(&self) -> Result<()> {
        validate_budget(self.max_iterations, Some(self.tolerance))
    }
}

/// Whether signs of values differ. Avoids the product test, which underflows.
fn is_sign_change(lhs: f64, rhs: f64) -> bool {
    lhs.signum() != rhs.signum()
}

enum BracketStart {
    Root(f64),
    Valid { a: f64, b: f64, fa: f64, fb: f64 },
}

fn open_bracket<F>(f: &F, a: f64, b: f64) -> Result<BracketStart>
where
    F: Fn(f64) -> f64,
{
    if !a.is_finite() || !b.is_finite() {
        return Err(NumericError::InvalidInput(format!(
            "bracket endpoints must be finite, got [{a}, {b}]"
        )));
    }
    let (a, b) = if a <= b { (a, b) } else { (b, a) };

    let fa = f(a);
    if fa == 0.0 {
        return Ok(BracketStart::Root(a));
    }
    let fb = f(b);
    if fb == 0.0 {
        return Ok(BracketStart::Root(b));
    }
    if fa.is_nan() || fb.is_nan() || !is_sign_change(fa, fb) {
        return Err(NumericError::InvalidBracket { a, b, fa, fb });
    }
    Ok(BracketStart::Valid { a, b, fa, fb })
}

fn exact_root(x: f64) -> RootResult {
    ConvergenceResult {
        estimate: x,
        iterations: 0,
        termination: Termination::ExactRoot,
        history: Vec::new(),
    }
}

fn finish(
    method: &str,
    estimate: f64,
    iterations: usize,
    termination: Termination,
    history: Vec<RootIterate>,
) -> RootResult {
    match termination {
        Termination::Converged | Termination::ExactRoot => {
            debug!("{method}: root {estimate} after {iterations} iterations")
        }
        _ => debug!("{method}: stopped with {termination:?} after {iterations} iterations"),
    }
    ConvergenceResult {
        estimate,
        iterations,
        termination,
        history,
    }
}

/// Root finding via the bisection method.
///
/// Stops when `f(midpoint) == 0` or the current bracket is no wider than the
/// tolerance. Always converges for a valid bracket, linearly.
pub fn bisection<F>(f: &F, a: f64, b: f64, settings: RootSettings) -> Result<RootResult>
where
    F: Fn(f64) -> f64,
{
    settings.validate()?;
    let (mut a, mut b, mut fa) = match open_bracket(f, a, b)? {
        BracketStart::Root(x) => return Ok(exact_root(x)),
        BracketStart::Valid { a, b, fa, .. } => (a, b, fa),
    };

    let mut history = history_with_budget(settings.max_iterations);
    let mut x = a;
    for k in 1..=settings.max_iterations {
        x = a + (b - a) / 2.0;
        let y = f(x);
        if settings.verbose {
            info!("bisection {k:4}  a={a:12.9}  b={b:12.9}  x={x:12.9}  f(x)={y:12.9}");
        }
        history.push(RootIterate {
            iteration: k,
            x,
            fx: y,
            bracket: Some((a, b)),
        });

        if y == 0.0 || b - a <= settings.tolerance {
            return Ok(finish("bisection", x, k, Termination::Converged, history));
        }

        if is_sign_change(fa, y) {
            b = x;
        } else {
            a = x;
            fa = y;
        }
    }
    Ok(finish(
        "bisection",
        x,
        settings.max_iterations,
        Termination::IterationLimit,
        history,
    ))
}

/// Root finding via the method of false position.
///
/// Converges once `|f(x)|` drops below the tolerance. One endpoint can stay
/// fixed for the whole run, in which case convergence is slow; see [`illinois`].
pub fn regula_falsi<F>(f: &F, a: f64, b: f64, settings: RootSettings) -> Result<RootResult>
where
    F: Fn(f64) -> f64,
{
    settings.validate()?;
    let (mut a, mut b, mut fa, mut fb) = match open_bracket(f, a, b)? {
        BracketStart::Root(x) => return Ok(exact_root(x)),
        BracketStart::Valid { a, b, fa, fb } => (a, b, fa, fb),
    };

    let mut history = history_with_budget(settings.max_iterations);
    let mut x = a;
    for k in 1..=settings.max_iterations {
        x = a - fa * (b - a) / (fb - fa);
        let y = f(x);
        if settings.verbose {
            info!("regula falsi {k:4}  a={a:15.9}  b={b:15.9}  x={x:15.9}  f(x)={y:15.9}");
        }
        history.push(RootIterate {
            iteration: k,
            x,
            fx: y,
            bracket: Some((a, b)),
        });

        if y.abs() < settings.tolerance {
            return Ok(finish("regula falsi", x, k, Termination::Converged, history));
        }

        if is_sign_change(fa, y) {
            b = x;
            fb = y;
        } else {
            a = x;
            fa = y;
        }
    }
    Ok(finish(
        "regula falsi",
        x,
        settings.max_iterations,
        Termination::IterationLimit,
        history,
    ))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Endpoint {
    Lower,
    Upper,
}

/// Modified regula falsi (Illinois variant).
///
/// Identical to [`regula_falsi`] except that when the same endpoint is
/// replaced twice in a row, the stored function value of the stationary
/// endpoint is halved. This pulls the next secant toward the stale side and
/// restores superlinear convergence.
pub fn illinois<F>(f: &F, a: f64, b: f64, settings: RootSettings) -> Result<RootResult>
where
    F: Fn(f64) -> f64,
{
    settings.validate()?;
    let (mut a, mut b, mut fa, mut fb) = match open_bracket(f, a, b)? {
        BracketStart::Root(x) => return Ok(exact_root(x)),
        BracketStart::Valid { a, b, fa, fb } => (a, b, fa, fb),
    };

    let mut history = history_with_budget(settings.max_iterations);
    let mut last_replaced: Option<Endpoint> = None;
    let mut x = a;
    for k in 1..=settings.max_iterations {
        x = b - fb * (b - a) / (fb - fa);
        let y = f(x);
        if settings.verbose {
            info!("illinois {k:4}  a={a:.8}  b={b:.8}  c={x:.8}  f(c)={y:.8}");
        }
        history.push(RootIterate {
            iteration: k,
            x,
            fx: y,
            bracket: Some((a, b)),
        });

        if y.abs() < settings.tolerance {
            return Ok(finish("illinois", x, k, Termination::Converged, history));
        }

        if is_sign_change(fa, y) {
            b = x;
            fb = y;
            if last_replaced == Some(Endpoint::Upper) {
                fa /= 2.0;
            }
            last_replaced = Some(Endpoint::Upper);
        } else {
            a = x;
            fa = y;
            if last_replaced == Some(Endpoint::Lower) {
                fb /= 2.0;
            }
            last_replaced = Some(Endpoint::Lower);
        }
    }
    Ok(finish(
        "illinois",
        x,
        settings.max_iterations,
        Termination::IterationLimit,
        history,
    ))
}

/// Root finding via the secant method.
///
/// No bracketing guarantee. Equal function values at the two starting
/// guesses are rejected up front; if they recur later the run stops with
/// [`Termination::EqualFunctionValues`].
pub fn secant<F>(f: &F, x0: f64, x1: f64, settings: RootSettings) -> Result<RootResult>
where
    F: Fn(f64) -> f64,
{
    settings.validate()?;
    if !x0.is_finite() || !x1.is_finite() {
        return Err(NumericError::InvalidInput(format!(
            "initial guesses must be finite, got {x0} and {x1}"
        )));
    }

    let (mut x0, mut x1) = (x0, x1);
    let mut y0 = f(x0);
    if y0 == 0.0 {
        return Ok(exact_root(x0));
    }
    let mut y1 = f(x1);
    if y1 == 0.0 {
        return Ok(exact_root(x1));
    }
    if y0 == y1 {
        return Err(NumericError::EqualFunctionValues { x0, x1 });
    }

    let mut history = history_with_budget(settings.max_iterations);
    for k in 1..=settings.max_iterations {
        if y1 == y0 {
            return Ok(finish(
                "secant",
                x1,
                k - 1,
                Termination::EqualFunctionValues { x0, x1 },
                history,
            ));
        }
        let x = x1 - y1 * (x1 - x0) / (y1 - y0);
        if !x.is_finite() {
            return Ok(finish(
                "secant",
                x1,
                k - 1,
                Termination::NonFinite { x: x1 },
                history,
            ));
        }
        let y = f(x);
        if settings.verbose {
            info!("secant {k:4}  x={x:14.10}  f(x)={y:14.10}");
        }
        history.push(RootIterate {
            iteration: k,
            x,
            fx: y,
            bracket: None,
        });

        if y == 0.0 || (x - x1).abs() <= settings.tolerance {
            return Ok(finish("secant", x, k, Termination::Converged, history));
        }

        x0 = x1;
        y0 = y1;
        x1 = x;
        y1 = y;
    }
    Ok(finish(
        "secant",
        x1,
        settings.max_iterations,
        Termination::IterationLimit,
        history,
    ))
}

/// Root finding using Newton-Raphson. `f` and `df` are the function and its
/// first derivative; `x0` is the initial guess.
///
/// Converges when successive iterates are within the tolerance. A derivative
/// of exactly zero stops the run with [`Termination::ZeroDerivative`].
pub fn newton_raphson<F1, F2>(
    f: &F1,
    df: &F2,
    x0: f64,
    settings: RootSettings,
) -> Result<RootResult>
where
    F1: Fn(f64) -> f64,
    F2: Fn(f64) -> f64,
{
    settings.validate()?;
    if !x0.is_finite() {
        return Err(NumericError::InvalidInput(format!(
            "initial guess must be finite, got {x0}"
        )));
    }

    let mut history = history_with_budget(settings.max_iterations);
    let mut x = x0;
    for k in 1..=settings.max_iterations {
        let fx = f(x);
        let dfx = df(x);
        if settings.verbose {
            info!("newton {k:8}  x={x:14.10}  f(x)={fx:14.10}");
        }
        history.push(RootIterate {
            iteration: k,
            x,
            fx,
            bracket: None,
        });

        if dfx == 0.0 {
            return Ok(finish(
                "newton",
                x,
                k,
                Termination::ZeroDerivative { x },
                history,
            ));
        }
        let x_new = x - fx / dfx;
        if !x_new.is_finite() {
            return Ok(finish("newton", x, k, Termination::NonFinite { x }, history));
        }
        if (x_new - x).abs() <= settings.tolerance {
            return Ok(finish("newton", x_new, k, Termination::Converged, history));
        }
        x = x_new;
    }
    Ok(finish(
        "newton",
        x,
        settings.max_iterations,
        Termination::IterationLimit,
        history,
    ))
}

/// Scans `[lo, hi]` in windows of width `window` and returns the first window
/// over which `f` changes sign (or vanishes at its left end). For a continuous
/// function the window contains a root; otherwise it may hold a singularity.
pub fn first_bracket<F>(f: &F, lo: f64, hi: f64, window: f64) -> Result<Option<(f64, f64)>>
where
    F: Fn(f64) -> f64,
{
    if !lo.is_finite() || !hi.is_finite() || lo > hi {
        return Err(NumericError::InvalidInput(format!(
            "scan interval must be finite and ordered, got [{lo}, {hi}]"
        )));
    }
    if !window.is_finite() || window <= 0.0 {
        return Err(NumericError::InvalidInput(format!(
            "scan window must be positive, got {window}"
        )));
    }

    let mut a = lo;
    let mut b = (lo + window).min(hi);
    let mut f_a = f(a);
    while a < hi {
        let f_b = f(b);
        if f_a == 0.0 || is_sign_change(f_a, f_b) {
            return Ok(Some((a, b)));
        }
        f_a = f_b;
        a = b;
        b = (b + window).min(hi);
    }
    Ok(None)
}
