/// A first-order ODE system `y' = f(t, y)`.
pub trait DynamicalSystem {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the right-hand side.
    /// t: current time
    /// y: current state
    /// out: buffer receiving dy/dt
    fn apply(&self, t: f64, y: &[f64], out: &mut [f64]);
}

/// A fixed-step integrator that advances a system in place.
pub trait Steppable {
    /// State dimension the scratch buffers were sized for.
    fn dimension(&self) -> usize;

    /// Performs one step of size dt, updating `t` and `state`.
    fn step(&mut self, system: &impl DynamicalSystem, t: &mut f64, state: &mut [f64], dt: f64);
}

/// Blanket system for a scalar right-hand side `f(t, y)`.
pub struct ScalarOde<F> {
    f: F,
}

impl<F> ScalarOde<F>
where
    F: Fn(f64, f64) -> f64,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> DynamicalSystem for ScalarOde<F>
where
    F: Fn(f64, f64) -> f64,
{
    fn dimension(&self) -> usize {
        1
    }

    fn apply(&self, t: f64, y: &[f64], out: &mut [f64]) {
        out[0] = (self.f)(t, y[0]);
    }
}
