//! Interpolation, quadrature and ODE exports.

use crate::{core_error, js_binary, js_scalar, parse_settings, serialize};
use numeth_core::interpolation::DividedDifferences;
use numeth_core::ode;
use numeth_core::quadrature::{self, StepSettings};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct DividedDifferenceReport {
    /// Lower-triangular table, one array per row.
    table: Vec<Vec<f64>>,
    coefficients: Vec<f64>,
}

#[wasm_bindgen(js_name = dividedDifferences)]
pub fn divided_differences(x: Vec<f64>, y: Vec<f64>) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let dd = DividedDifferences::new(&x, &y).map_err(|e| core_error("Divided differences", e))?;
    let table: Vec<Vec<f64>> = dd
        .table()
        .row_iter()
        .map(|row| row.iter().copied().collect::<Vec<f64>>())
        .collect();
    serialize(&DividedDifferenceReport {
        table,
        coefficients: dd.coefficients(),
    })
}

/// `grid_val` is `{ subdivisions }` or `{ step_size }`, as for every grid
/// taking export below.
#[wasm_bindgen]
pub fn trapezoidal(
    f: &js_sys::Function,
    a: f64,
    b: f64,
    grid_val: JsValue,
) -> Result<f64, JsValue> {
    console_error_panic_hook::set_once();
    let steps: StepSettings = parse_settings(grid_val)?;
    quadrature::trapezoidal(&js_scalar(f), a, b, &steps)
        .map_err(|e| core_error("Trapezoidal rule", e))
}

#[wasm_bindgen(js_name = simpsonOneThird)]
pub fn simpson_one_third(
    f: &js_sys::Function,
    a: f64,
    b: f64,
    grid_val: JsValue,
) -> Result<f64, JsValue> {
    console_error_panic_hook::set_once();
    let steps: StepSettings = parse_settings(grid_val)?;
    quadrature::simpson_one_third(&js_scalar(f), a, b, &steps)
        .map_err(|e| core_error("Simpson's 1/3 rule", e))
}

/// Marches `y' = f(t, y)` from `a` to `b`; the result is `{ t: [...], y: [...] }`.
#[wasm_bindgen]
pub fn euler(
    f: &js_sys::Function,
    a: f64,
    b: f64,
    y0: f64,
    grid_val: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let steps: StepSettings = parse_settings(grid_val)?;
    let solution =
        ode::euler_interval(js_binary(f), a, b, y0, &steps).map_err(|e| core_error("Euler", e))?;
    serialize(&solution)
}

#[wasm_bindgen]
pub fn rk4(
    f: &js_sys::Function,
    a: f64,
    b: f64,
    y0: f64,
    grid_val: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let steps: StepSettings = parse_settings(grid_val)?;
    let solution =
        ode::rk4_interval(js_binary(f), a, b, y0, &steps).map_err(|e| core_error("RK4", e))?;
    serialize(&solution)
}
