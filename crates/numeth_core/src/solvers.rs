use crate::traits::{DynamicalSystem, Steppable};

/// Explicit (forward) Euler: one evaluation per step.
pub struct Euler {
    k1: Vec<f64>,
}

impl Euler {
    pub fn new(dim: usize) -> Self {
        Self { k1: vec![0.0; dim] }
    }
}

impl Steppable for Euler {
    fn dimension(&self) -> usize {
        self.k1.len()
    }

    fn step(&mut self, system: &impl DynamicalSystem, t: &mut f64, state: &mut [f64], dt: f64) {
        let t0 = *t;
        system.apply(t0, state, &mut self.k1);
        for (y, k) in state.iter_mut().zip(&self.k1) {
            *y += dt * k;
        }
        *t = t0 + dt;
    }
}

/// Classic Runge-Kutta 4th Order Solver
pub struct Rk4 {
    k1: Vec<f64>,
    k2: Vec<f64>,
    k3: Vec<f64>,
    k4: Vec<f64>,
    tmp: Vec<f64>,
}

impl Rk4 {
    pub fn new(dim: usize) -> Self {
        Self {
            k1: vec![0.0; dim],
            k2: vec![0.0; dim],
            k3: vec![0.0; dim],
            k4: vec![0.0; dim],
            tmp: vec![0.0; dim],
        }
    }
}

impl Steppable for Rk4 {
    fn dimension(&self) -> usize {
        self.k1.len()
    }

    fn step(&mut self, system: &impl DynamicalSystem, t: &mut f64, state: &mut [f64], dt: f64) {
        let t0 = *t;

        // k1 = f(t, y)
        system.apply(t0, state, &mut self.k1);

        // k2 = f(t + dt/2, y + dt*k1/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + 0.5 * dt * self.k1[i];
        }
        system.apply(t0 + 0.5 * dt, &self.tmp, &mut self.k2);

        // k3 = f(t + dt/2, y + dt*k2/2)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + 0.5 * dt * self.k2[i];
        }
        system.apply(t0 + 0.5 * dt, &self.tmp, &mut self.k3);

        // k4 = f(t + dt, y + dt*k3)
        for i in 0..state.len() {
            self.tmp[i] = state[i] + dt * self.k3[i];
        }
        system.apply(t0 + dt, &self.tmp, &mut self.k4);

        for i in 0..state.len() {
            state[i] += dt / 6.0 * (self.k1[i] + 2.0 * self.k2[i] + 2.0 * self.k3[i] + self.k4[i]);
        }

        *t = t0 + dt;
    }
}
