//! The planner's view of the outside world: where the vehicle and the
//! landing target will be at a given time.

use nalgebra::Vector3;

use super::{CentralBody, GeoSite, StateVector};
use crate::error::PlannerResult;

pub trait VehicleEphemeris {
    /// Position and velocity of the vehicle at `time`, assuming it coasts.
    fn state_at(&self, time: f64) -> PlannerResult<StateVector>;
}

pub trait TargetEphemeris {
    /// Position of the target at `time`, in the central body's
    /// non-rotating frame.
    fn position_at(&self, time: f64) -> Vector3<f64>;
}

impl<F> VehicleEphemeris for F
where
    F: Fn(f64) -> StateVector,
{
    fn state_at(&self, time: f64) -> PlannerResult<StateVector> {
        Ok(self(time))
    }
}

impl<F> TargetEphemeris for F
where
    F: Fn(f64) -> Vector3<f64>,
{
    fn position_at(&self, time: f64) -> Vector3<f64> {
        self(time)
    }
}

/// A vehicle on an unpowered two-body trajectory, known by its state at one
/// epoch.
#[derive(Debug, Clone)]
pub struct CoastingVehicle {
    mu: f64,
    epoch: f64,
    state: StateVector,
}

impl CoastingVehicle {
    pub fn new(body: &CentralBody, epoch: f64, state: StateVector) -> Self {
        Self {
            mu: body.mu,
            epoch,
            state,
        }
    }

    pub fn epoch(&self) -> f64 {
        self.epoch
    }
}

impl VehicleEphemeris for CoastingVehicle {
    fn state_at(&self, time: f64) -> PlannerResult<StateVector> {
        let primary = super::PointMass::with_mu(self.mu);
        Ok(self.state.propagate(primary, time - self.epoch)?)
    }
}

/// A fixed point above the surface, carried around by the body's rotation.
#[derive(Debug, Clone)]
pub struct SurfaceTarget {
    pub body: CentralBody,
    pub site: GeoSite,
    pub height: f64,
}

impl TargetEphemeris for SurfaceTarget {
    fn position_at(&self, time: f64) -> Vector3<f64> {
        self.body.site_position(&self.site, self.height, time)
    }
}
