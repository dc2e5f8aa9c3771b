//! Root finder exports.

use crate::{core_error, js_scalar, parse_settings, serialize, Outcome};
use numeth_core::convergence::{RootIterate, RootResult};
use numeth_core::roots::{self as core_roots, RootSettings};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct RootReport {
    root: f64,
    #[serde(flatten)]
    outcome: Outcome,
    history: Vec<RootIterate>,
}

fn report(method: &str, result: numeth_core::Result<RootResult>) -> Result<JsValue, JsValue> {
    let result = result.map_err(|e| core_error(method, e))?;
    serialize(&RootReport {
        root: result.estimate,
        outcome: Outcome::new(result.iterations, result.termination),
        history: result.history,
    })
}

#[wasm_bindgen]
pub fn bisection(
    f: &js_sys::Function,
    a: f64,
    b: f64,
    settings_val: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let settings: RootSettings = parse_settings(settings_val)?;
    report("Bisection", core_roots::bisection(&js_scalar(f), a, b, settings))
}

#[wasm_bindgen(js_name = regulaFalsi)]
pub fn regula_falsi(
    f: &js_sys::Function,
    a: f64,
    b: f64,
    settings_val: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let settings: RootSettings = parse_settings(settings_val)?;
    report("Regula falsi", core_roots::regula_falsi(&js_scalar(f), a, b, settings))
}

#[wasm_bindgen]
pub fn illinois(
    f: &js_sys::Function,
    a: f64,
    b: f64,
    settings_val: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let settings: RootSettings = parse_settings(settings_val)?;
    report("Illinois", core_roots::illinois(&js_scalar(f), a, b, settings))
}

#[wasm_bindgen]
pub fn secant(
    f: &js_sys::Function,
    x0: f64,
    x1: f64,
    settings_val: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let settings: RootSettings = parse_settings(settings_val)?;
    report("Secant", core_roots::secant(&js_scalar(f), x0, x1, settings))
}

#[wasm_bindgen(js_name = newtonRaphson)]
pub fn newton_raphson(
    f: &js_sys::Function,
    df: &js_sys::Function,
    x0: f64,
    settings_val: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let settings: RootSettings = parse_settings(settings_val)?;
    report(
        "Newton-Raphson",
        core_roots::newton_raphson(&js_scalar(f), &js_scalar(df), x0, settings),
    )
}

/// Scans `[lo, hi]` for the first sign change; returns `[a, b]` or `null`.
#[wasm_bindgen(js_name = firstBracket)]
pub fn first_bracket(
    f: &js_sys::Function,
    lo: f64,
    hi: f64,
    window: f64,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let bracket = core_roots::first_bracket(&js_scalar(f), lo, hi, window)
        .map_err(|e| core_error("Bracket scan", e))?;
    serialize(&bracket)
}
