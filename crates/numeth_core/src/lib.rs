pub mod convergence;
pub mod direct;
pub mod eigen;
pub mod error;
pub mod interpolation;
pub mod iterative;
pub mod linear_system;
pub mod ode;
pub mod quadrature;
pub mod roots;
pub mod solvers;
/// The `numeth_core` crate implements classical numerical-analysis algorithms over `f64`.
///
/// Key components:
/// - **Roots**: bisection, regula falsi, Illinois, secant and Newton-Raphson with full iteration traces.
/// - **Linear systems**: Gaussian elimination, Doolittle/Crout LU, and Jacobi/Gauss-Seidel/SOR sweeps.
/// - **Eigen**: power iteration for the dominant eigenpair.
/// - **Interpolation**: Newton divided-difference tables.
/// - **Quadrature**: composite trapezoidal and Simpson 1/3 rules.
/// - **ODE**: fixed-step Euler and RK4 through the `DynamicalSystem`/`Steppable` traits.
///
/// Precondition violations are returned as [`error::NumericError`]; iterative
/// methods report how they stopped through [`convergence::Termination`].
pub mod traits;

pub use convergence::{ConvergenceResult, Termination};
pub use error::{NumericError, Result};
pub use linear_system::LinearSystem;
