//! JavaScript bindings for `numeth_core`.
//!
//! Functions are passed in as JS callbacks; a callback that throws or returns
//! a non-number evaluates to `NaN`. Matrices travel as flat row-major arrays
//! together with their dimension, and every settings object is optional
//! (`undefined` selects the defaults).

mod calculus;
mod linear;
mod roots;

use nalgebra::{DMatrix, DVector};
use numeth_core::convergence::Termination;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

pub(crate) fn js_scalar(f: &js_sys::Function) -> impl Fn(f64) -> f64 + '_ {
    move |x| {
        f.call1(&JsValue::NULL, &JsValue::from_f64(x))
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(f64::NAN)
    }
}

pub(crate) fn js_binary(f: &js_sys::Function) -> impl Fn(f64, f64) -> f64 + '_ {
    move |t, y| {
        f.call2(&JsValue::NULL, &JsValue::from_f64(t), &JsValue::from_f64(y))
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(f64::NAN)
    }
}

pub(crate) fn parse_settings<T>(settings_val: JsValue) -> Result<T, JsValue>
where
    T: DeserializeOwned + Default,
{
    if settings_val.is_undefined() || settings_val.is_null() {
        return Ok(T::default());
    }
    from_value(settings_val).map_err(|e| JsValue::from_str(&format!("Invalid settings: {}", e)))
}

pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

pub(crate) fn core_error(method: &str, err: numeth_core::NumericError) -> JsValue {
    JsValue::from_str(&format!("{} failed: {}", method, err))
}

pub(crate) fn input_error(err: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("Invalid input: {}", err))
}

/// Builds an `n×n` matrix from row-major entries.
pub(crate) fn square_from_row_major(entries: &[f64], n: usize) -> anyhow::Result<DMatrix<f64>> {
    if n == 0 {
        anyhow::bail!("Matrix dimension must be positive.");
    }
    if entries.len() != n * n {
        anyhow::bail!(
            "Expected {} matrix entries for a {}x{} matrix, got {}.",
            n * n,
            n,
            n,
            entries.len()
        );
    }
    Ok(DMatrix::from_row_slice(n, n, entries))
}

/// Optional initial vector: an empty array means "use the default".
pub(crate) fn optional_vector(values: &[f64], n: usize) -> anyhow::Result<Option<DVector<f64>>> {
    if values.is_empty() {
        return Ok(None);
    }
    if values.len() != n {
        anyhow::bail!(
            "Initial vector has {} entries but the system has {} unknowns.",
            values.len(),
            n
        );
    }
    Ok(Some(DVector::from_column_slice(values)))
}

pub(crate) fn to_row_major(m: &DMatrix<f64>) -> Vec<f64> {
    let mut out = Vec::with_capacity(m.nrows() * m.ncols());
    for row in m.row_iter() {
        out.extend(row.iter().copied());
    }
    out
}

/// Common shape of every iterative result sent back to JS.
#[derive(Serialize)]
pub(crate) struct Outcome {
    pub iterations: usize,
    pub converged: bool,
    pub termination: Termination,
}

impl Outcome {
    pub(crate) fn new(iterations: usize, termination: Termination) -> Self {
        Self {
            iterations,
            converged: termination.is_converged(),
            termination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_entries_fill_rows_first() {
        let m = square_from_row_major(&[1.0, 2.0, 3.0, 4.0], 2).expect("matrix");
        assert_eq!(m[(0, 1)], 2.0);
        assert_eq!(m[(1, 0)], 3.0);
        assert_eq!(to_row_major(&m), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn square_from_row_major_checks_entry_count() {
        let err = square_from_row_major(&[1.0, 2.0, 3.0], 2).expect_err("three entries");
        assert!(err.to_string().contains("Expected 4 matrix entries"));
        assert!(square_from_row_major(&[], 0).is_err());
    }

    #[test]
    fn empty_initial_vector_means_default() {
        assert_eq!(optional_vector(&[], 3).expect("empty"), None);
        assert_eq!(
            optional_vector(&[1.0, 2.0], 2).expect("vector"),
            Some(DVector::from_vec(vec![1.0, 2.0]))
        );
        let err = optional_vector(&[1.0], 2).expect_err("too short");
        assert!(err.to_string().contains("2 unknowns"));
    }

    #[test]
    fn outcome_mirrors_termination() {
        let outcome = Outcome::new(4, Termination::IterationLimit);
        assert!(!outcome.converged);
        assert!(Outcome::new(0, Termination::ExactRoot).converged);
    }
}
