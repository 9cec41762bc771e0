//! Closed-loop guidance for the braking phase.
//!
//! Rather than fly a burn computed once, the transfer is re-solved every
//! control step from wherever the vehicle actually is. The arrival time is
//! held fixed, so the flight time shrinks by however much time passed since
//! the last step, and the aim point stays on the moving target.

use nalgebra::Vector3;
use tracing::debug;

use super::search::{CellReport, Objective, SearchGrid, TrajectorySearch, TransferCandidate};
use crate::astro::{TargetEphemeris, VehicleEphemeris};
use crate::error::PlannerResult;

#[derive(Debug, Clone, Copy)]
pub struct GuidanceCommand {
    pub candidate: TransferCandidate,
    /// Velocity change the vehicle should be working towards right now.
    pub velocity_change: Vector3<f64>,
}

#[derive(Debug, Clone)]
pub struct BrakingGuidance {
    last_time: f64,
    duration_estimate: f64,
}

impl BrakingGuidance {
    /// Starts guiding at `now`, with `remaining` seconds of nominal transfer
    /// left.
    pub fn new(now: f64, remaining: f64) -> Self {
        Self {
            last_time: now,
            duration_estimate: remaining,
        }
    }

    pub fn duration_estimate(&self) -> f64 {
        self.duration_estimate
    }

    pub fn arrival_time(&self) -> f64 {
        self.last_time + self.duration_estimate
    }

    /// Re-solves the transfer, departing at `now`.
    ///
    /// Fails with [crate::error::PlannerError::NoFeasibleTransferInWindow] once
    /// the remaining flight time can't be flown ballistically, at which point
    /// the caller should hand over to terminal descent.
    pub fn step<V, T>(
        &mut self,
        search: &TrajectorySearch<V, T>,
        now: f64,
        on_cell: impl FnMut(&CellReport),
    ) -> PlannerResult<GuidanceCommand>
    where
        V: VehicleEphemeris,
        T: TargetEphemeris,
    {
        let duration = self.duration_estimate - (now - self.last_time);
        let grid = SearchGrid::single(now, duration);
        let candidate = search.run(&grid, Objective::FirstFeasible, on_cell)?;

        self.last_time = now;
        self.duration_estimate = candidate.transfer_duration;
        debug!(
            "guidance at t = {}: {} s to go, delta-v {}",
            now, self.duration_estimate, candidate.delta_v
        );

        Ok(GuidanceCommand {
            candidate,
            velocity_change: candidate.delta_v_vector,
        })
    }
}
