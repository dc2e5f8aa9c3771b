use thiserror::Error;

/// Errors reported by the numerical methods in this crate.
///
/// Precondition violations are raised before any iteration begins. Numeric
/// degeneracies met mid-iteration are carried by [`crate::convergence::Termination`]
/// instead, and only become errors through `ConvergenceResult::into_converged`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericError {
    /// Function values at the bracket endpoints do not change sign.
    #[error("Invalid bracket [{a}, {b}]: f(a) = {fa} and f(b) = {fb} must have opposite signs")]
    InvalidBracket { a: f64, b: f64, fa: f64, fb: f64 },

    /// Secant slope is undefined because both points share a function value.
    #[error("Equal function values at x0 = {x0} and x1 = {x1}; secant slope is undefined")]
    EqualFunctionValues { x0: f64, x1: f64 },

    /// Derivative vanished at an iterate.
    #[error("Derivative is zero at x = {x}")]
    ZeroDerivative { x: f64 },

    /// An iterate stopped being a finite number.
    #[error("Iteration produced a non-finite value from x = {x}")]
    NonFinite { x: f64 },

    /// Normalizing entry of the power iteration was exactly zero.
    #[error("Power iteration produced a zero vector; no dominant eigenvalue can be extracted")]
    ZeroNormalizer,

    /// The iteration budget ran out before the tolerance was met.
    #[error("Failed to converge within {iterations} iterations")]
    NotConverged { iterations: usize },

    #[error("Dimension mismatch in {context}: expected {expected}, got {got}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("Empty input: {0}")]
    EmptyInput(&'static str),

    /// A diagonal pivot needed as a divisor is exactly zero.
    #[error("Singular matrix: pivot at index {index} is zero (value: {value})")]
    SingularMatrix { index: usize, value: f64 },

    #[error("Zero found on the diagonal at index {index}; iterative method cannot be used")]
    ZeroDiagonal { index: usize },

    #[error("Relaxation parameter omega = {omega} must lie in (0, 2)")]
    InvalidRelaxationParameter { omega: f64 },

    #[error("Either the number of subdivisions or the step size must be provided")]
    MissingStepParameter,

    #[error("Provide only one of the number of subdivisions or the step size")]
    ConflictingStepParameters,

    #[error("Simpson's 1/3 rule needs an even number of subdivisions, got {n}")]
    OddSubdivision { n: usize },

    #[error("Invalid step size {h}")]
    InvalidStepSize { h: f64 },

    /// Two interpolation nodes share the same abscissa.
    #[error("Duplicate abscissa x = {x} at positions {first} and {second}")]
    DuplicateAbscissa { first: usize, second: usize, x: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

pub type Result<T> = std::result::Result<T, NumericError>;

/// Checks the iteration settings shared by every iterative method.
pub(crate) fn validate_budget(max_iterations: usize, tolerance: Option<f64>) -> Result<()> {
    if max_iterations == 0 {
        return Err(NumericError::InvalidSetting(
            "max_iterations must be greater than zero".to_string(),
        ));
    }
    if let Some(tol) = tolerance {
        if !tol.is_finite() || tol <= 0.0 {
            return Err(NumericError::InvalidSetting(format!(
                "tolerance must be positive and finite, got {tol}"
            )));
        }
    }
    Ok(())
}
