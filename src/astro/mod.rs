//! The physical model the planner runs against: states, the central body,
//! and the ephemerides that predict where the vehicle and target will be.

mod body;
mod ephemeris;
mod shape;
mod state;

pub use body::{CentralBody, GeoSite};
pub use ephemeris::{CoastingVehicle, SurfaceTarget, TargetEphemeris, VehicleEphemeris};
pub use shape::OrbitShape;
pub use state::StateVector;

/// A trait indicating this object can be used in physical computations that
/// require a massive body.
pub trait HasMass {
    /// The standard gravitational parameter of this object
    fn mu(&self) -> f64;
}

/// A point mass with no other physical properties.
///
/// Useful for satisfying a [HasMass] trait bound.
#[derive(Debug, Clone, Copy)]
pub struct PointMass(f64);

impl PointMass {
    pub fn with_mu(mu: f64) -> Self {
        Self(mu)
    }
}

impl HasMass for PointMass {
    fn mu(&self) -> f64 {
        self.0
    }
}

impl<T> HasMass for &T
where
    T: HasMass,
{
    fn mu(&self) -> f64 {
        (*self).mu()
    }
}
