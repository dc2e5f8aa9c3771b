//! Linear system and eigenvalue exports.

use crate::{
    core_error, input_error, optional_vector, parse_settings, serialize, square_from_row_major,
    to_row_major, Outcome,
};
use nalgebra::DVector;
use numeth_core::convergence::IterativeResult;
use numeth_core::direct::{self, EliminationSettings, LinearSolution, LuFactors};
use numeth_core::eigen::{power_method as core_power_method, PowerSettings};
use numeth_core::iterative::{self, IterativeSettings};
use numeth_core::LinearSystem;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct EliminationReport {
    status: &'static str,
    x: Option<Vec<f64>>,
}

#[derive(Serialize)]
struct LuReport {
    n: usize,
    l: Vec<f64>,
    u: Vec<f64>,
    x: Option<Vec<f64>>,
}

#[derive(Serialize)]
struct SweepRecord {
    iteration: usize,
    x: Vec<f64>,
    residual: f64,
}

#[derive(Serialize)]
struct IterativeReport {
    x: Vec<f64>,
    #[serde(flatten)]
    outcome: Outcome,
    history: Vec<SweepRecord>,
}

#[derive(Serialize)]
struct PowerReport {
    eigenvalue: f64,
    eigenvector: Vec<f64>,
    #[serde(flatten)]
    outcome: Outcome,
    eigenvalues: Vec<f64>,
    eigenvectors: Vec<Vec<f64>>,
}

fn build_system(a: &[f64], b: &[f64]) -> Result<LinearSystem, JsValue> {
    let n = b.len();
    let matrix = square_from_row_major(a, n).map_err(input_error)?;
    LinearSystem::new(matrix, DVector::from_column_slice(b))
        .map_err(|e| core_error("Linear system", e))
}

fn iterative_report(result: IterativeResult) -> Result<JsValue, JsValue> {
    serialize(&IterativeReport {
        x: result.estimate.as_slice().to_vec(),
        outcome: Outcome::new(result.iterations, result.termination),
        history: result
            .history
            .into_iter()
            .map(|r| SweepRecord {
                iteration: r.iteration,
                x: r.x.as_slice().to_vec(),
                residual: r.residual,
            })
            .collect(),
    })
}

fn lu_report(factors: LuFactors, b: &[f64]) -> Result<JsValue, JsValue> {
    let n = factors.l.nrows();
    let x = if b.is_empty() {
        None
    } else {
        let x = factors
            .solve(&DVector::from_column_slice(b))
            .map_err(|e| core_error("LU solve", e))?;
        Some(x.as_slice().to_vec())
    };
    serialize(&LuReport {
        n,
        l: to_row_major(&factors.l),
        u: to_row_major(&factors.u),
        x,
    })
}

/// `a` is row-major `n×n` with `n = b.length`.
#[wasm_bindgen(js_name = gaussianElimination)]
pub fn gaussian_elimination(
    a: Vec<f64>,
    b: Vec<f64>,
    settings_val: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let settings: EliminationSettings = parse_settings(settings_val)?;
    let system = build_system(&a, &b)?;
    let report = match direct::gaussian_elimination(&system, settings) {
        LinearSolution::Unique(x) => EliminationReport {
            status: "unique",
            x: Some(x.as_slice().to_vec()),
        },
        LinearSolution::NoUniqueSolution => EliminationReport {
            status: "no_unique_solution",
            x: None,
        },
        LinearSolution::NoSolution => EliminationReport {
            status: "no_solution",
            x: None,
        },
    };
    serialize(&report)
}

/// Factors the row-major `n×n` matrix `a`. If `b` is non-empty the system is
/// solved with the factors as well.
#[wasm_bindgen(js_name = luDoolittle)]
pub fn lu_doolittle(a: Vec<f64>, n: usize, b: Vec<f64>) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let matrix = square_from_row_major(&a, n).map_err(input_error)?;
    let factors = direct::lu_doolittle(&matrix).map_err(|e| core_error("Doolittle LU", e))?;
    lu_report(factors, &b)
}

#[wasm_bindgen(js_name = luCrout)]
pub fn lu_crout(a: Vec<f64>, n: usize, b: Vec<f64>) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let matrix = square_from_row_major(&a, n).map_err(input_error)?;
    let factors = direct::lu_crout(&matrix).map_err(|e| core_error("Crout LU", e))?;
    lu_report(factors, &b)
}

/// An empty `x0` starts from the zero vector.
#[wasm_bindgen]
pub fn jacobi(
    a: Vec<f64>,
    b: Vec<f64>,
    x0: Vec<f64>,
    settings_val: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let settings: IterativeSettings = parse_settings(settings_val)?;
    let system = build_system(&a, &b)?;
    let x0 = optional_vector(&x0, system.dim()).map_err(input_error)?;
    let result =
        iterative::jacobi(&system, x0.as_ref(), settings).map_err(|e| core_error("Jacobi", e))?;
    iterative_report(result)
}

#[wasm_bindgen(js_name = gaussSeidel)]
pub fn gauss_seidel(
    a: Vec<f64>,
    b: Vec<f64>,
    x0: Vec<f64>,
    settings_val: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let settings: IterativeSettings = parse_settings(settings_val)?;
    let system = build_system(&a, &b)?;
    let x0 = optional_vector(&x0, system.dim()).map_err(input_error)?;
    let result = iterative::gauss_seidel(&system, x0.as_ref(), settings)
        .map_err(|e| core_error("Gauss-Seidel", e))?;
    iterative_report(result)
}

#[wasm_bindgen]
pub fn sor(
    a: Vec<f64>,
    b: Vec<f64>,
    x0: Vec<f64>,
    omega: f64,
    settings_val: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let settings: IterativeSettings = parse_settings(settings_val)?;
    let system = build_system(&a, &b)?;
    let x0 = optional_vector(&x0, system.dim()).map_err(input_error)?;
    let result =
        iterative::sor(&system, x0.as_ref(), omega, settings).map_err(|e| core_error("SOR", e))?;
    iterative_report(result)
}

/// `x0` must have `n` entries; the matrix is inferred as `n×n`.
#[wasm_bindgen(js_name = powerMethod)]
pub fn power_method(a: Vec<f64>, x0: Vec<f64>, settings_val: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let settings: PowerSettings = parse_settings(settings_val)?;
    let matrix = square_from_row_major(&a, x0.len()).map_err(input_error)?;
    let result = core_power_method(&matrix, &DVector::from_column_slice(&x0), settings)
        .map_err(|e| core_error("Power method", e))?;

    // one eigenvalue per iteration, one eigenvector per iterate including x0
    let eigenvalues: Vec<f64> = result.history.iter().filter_map(|r| r.eigenvalue).collect();
    let eigenvectors: Vec<Vec<f64>> = result
        .history
        .iter()
        .map(|r| r.eigenvector.as_slice().to_vec())
        .collect();
    serialize(&PowerReport {
        eigenvalue: result.estimate.eigenvalue,
        eigenvector: result.estimate.eigenvector.as_slice().to_vec(),
        outcome: Outcome::new(result.iterations, result.termination),
        eigenvalues,
        eigenvectors,
    })
}
