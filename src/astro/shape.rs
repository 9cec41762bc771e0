use std::f64::consts::PI;

use nalgebra::Vector3;

use super::{HasMass, StateVector};
use crate::error::{PlannerError, PlannerResult};
use crate::math::anomaly::TrueAnomaly;
use crate::math::geometry::{angle_between_positions, eccentricity_vector};

// Below this, the periapsis direction is numerically meaningless
const CIRCULAR_ECCENTRICITY: f64 = 1e-9;

/// Size and shape of an elliptic orbit.
#[derive(Debug, Clone)]
pub struct OrbitShape {
    pub eccentricity: f64,
    pub semimajor_axis: f64,
    pub period: f64,
    periapsis_direction: Vector3<f64>,
    normal: Vector3<f64>,
}

impl OrbitShape {
    /// Fails with [PlannerError::UnboundOrbit] unless the state is on an
    /// ellipse.
    pub fn from_state(state: &StateVector, primary: impl HasMass) -> PlannerResult<Self> {
        let mu = primary.mu();
        let ecc_vector = eccentricity_vector(&state.position, &state.velocity, mu);
        let eccentricity = ecc_vector.norm();

        // vis-viva: v^2 = mu (2/r - 1/a)
        let alpha = 2.0 / state.position.norm() - state.velocity.norm_squared() / mu;
        if eccentricity >= 1.0 || alpha <= 0.0 {
            return Err(PlannerError::UnboundOrbit { eccentricity });
        }
        let semimajor_axis = alpha.recip();

        let normal = state.angular_momentum();
        let periapsis_direction = if eccentricity < CIRCULAR_ECCENTRICITY {
            // Any direction works; measure from the current position
            state.position
        } else {
            ecc_vector
        };

        Ok(Self {
            eccentricity,
            semimajor_axis,
            period: 2.0 * PI * (semimajor_axis.powi(3) / mu).sqrt(),
            periapsis_direction,
            normal,
        })
    }

    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// True anomaly of a position in the plane of this orbit.
    pub fn true_anomaly_of(&self, position: &Vector3<f64>) -> TrueAnomaly {
        TrueAnomaly::from_degrees(angle_between_positions(
            &self.periapsis_direction,
            position,
            &self.normal,
        ))
    }
}
