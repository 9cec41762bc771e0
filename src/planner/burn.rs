//! Sizing burns with the ideal rocket equation.
//!
//! Thrust and specific impulse are taken as constant for the whole burn, so
//! durations are estimates rather than exact integrals.

use nalgebra::Vector3;

use super::search::TransferCandidate;

/// Standard gravity, in m/s^2, used to turn specific impulse into exhaust
/// velocity.
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Seconds of constant thrust needed to change velocity by `delta_v`.
pub fn estimate_burn_duration(delta_v: f64, initial_mass: f64, thrust: f64, isp: f64) -> f64 {
    let exhaust_velocity = isp * STANDARD_GRAVITY;
    let final_mass = initial_mass * (-delta_v / exhaust_velocity).exp();
    let fuel_mass = initial_mass - final_mass;

    // thrust / v_e is the mass flow rate
    fuel_mass / (thrust / exhaust_velocity)
}

/// What the vehicle can do, as reported at planning time.
#[derive(Debug, Clone, Copy)]
pub struct Propulsion {
    /// kg
    pub mass: f64,
    /// N
    pub thrust: f64,
    /// s
    pub isp: f64,
}

impl Propulsion {
    pub fn burn_duration(&self, delta_v: f64) -> f64 {
        estimate_burn_duration(delta_v, self.mass, self.thrust, self.isp)
    }
}

/// A burn ready to hand to whatever flies the vehicle.
#[derive(Debug, Clone, Copy)]
pub struct ManeuverPlan {
    /// When to light the engine. Half the burn happens before the departure
    /// instant and half after.
    pub start_time: f64,
    pub departure_time: f64,
    pub duration: f64,
    pub delta_v: Vector3<f64>,
}

impl ManeuverPlan {
    pub fn from_candidate(candidate: &TransferCandidate, propulsion: &Propulsion) -> Self {
        let duration = propulsion.burn_duration(candidate.delta_v);
        Self {
            start_time: candidate.departure_time - duration / 2.0,
            departure_time: candidate.departure_time,
            duration,
            delta_v: candidate.delta_v_vector,
        }
    }

    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}
