use nalgebra::Vector3;

use super::HasMass;
use crate::math::geometry::specific_angular_momentum;
use crate::math::root_finding::{find_root_bracket, newton_plus_bisection, RootFindingError};
use crate::math::stumpff::stumpff_G;

const NUM_ITERATIONS_DELTA_T: usize = 2000;

/// Position and velocity relative to the center of the central body, in its
/// non-rotating frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl StateVector {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        Self { position, velocity }
    }

    pub fn energy(&self, primary: impl HasMass) -> f64 {
        // KE = 1/2 v^2, PE = - mu/r
        self.velocity.norm_squared() / 2.0 - primary.mu() / self.position.norm()
    }

    pub fn angular_momentum(&self) -> Vector3<f64> {
        specific_angular_momentum(&self.position, &self.velocity)
    }

    /// Coasts along the conic for `delta_t` seconds (which may be negative).
    ///
    /// Works in the universal anomaly s, where
    /// t(s) = r_0 G_1(β, s) + r_0 r_dot_0 G_2(β, s) + mu G_3(β, s).
    #[allow(non_snake_case)]
    pub fn propagate(&self, primary: impl HasMass, delta_t: f64) -> Result<Self, RootFindingError> {
        if delta_t == 0.0 {
            return Ok(*self);
        }

        let mu = primary.mu();
        let beta = -2.0 * self.energy(&primary);
        let r_0 = self.position.norm();
        let r_dot_0 = self.position.dot(&self.velocity) / r_0;

        // t'(s) is the radius at s, which is always positive, so t is
        // monotonic and has exactly one root.
        let f_and_f_prime = |s: f64| {
            let G = stumpff_G(beta, s);
            let t = r_0 * G[1] + r_0 * r_dot_0 * G[2] + mu * G[3];
            let r = r_0 * G[0] + r_0 * r_dot_0 * G[1] + mu * G[2];
            (t - delta_t, r)
        };

        let center = delta_t / r_0;
        let bracket = find_root_bracket(
            |s| f_and_f_prime(s).0,
            center,
            center.abs(),
            NUM_ITERATIONS_DELTA_T,
        )?;
        let s = newton_plus_bisection(f_and_f_prime, bracket, NUM_ITERATIONS_DELTA_T)?;

        let G = stumpff_G(beta, s);
        let f = 1.0 - mu / r_0 * G[2];
        let g = r_0 * G[1] + r_0 * r_dot_0 * G[2];
        let position = f * self.position + g * self.velocity;
        let r = position.norm();

        let f_dot = -mu / r_0 / r * G[1];
        let g_dot = r_0 / r * (G[0] + r_dot_0 * G[1]);
        let velocity = f_dot * self.position + g_dot * self.velocity;

        Ok(Self { position, velocity })
    }
}
