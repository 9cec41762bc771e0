//! Grid search over departure time and flight time.
//!
//! Each cell of the grid is one Lambert problem: leave the vehicle's
//! predicted position at the departure time, and arrive where the target
//! will be once the flight time has elapsed. Cells outside the feasible
//! window are skipped; the rest are ranked by the search's [Objective].

use std::fmt::Display;
use std::str::FromStr;

use nalgebra::Vector3;
use tracing::{debug, trace, warn};

use super::lambert::LambertProblem;
use crate::astro::{OrbitShape, PointMass, TargetEphemeris, VehicleEphemeris};
use crate::error::{PlannerError, PlannerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    /// Take the first feasible cell, scanning departure-major.
    FirstFeasible,
    /// Cheapest departure burn.
    MinDeltaV,
    /// Earliest arrival, counted from the first departure in the grid.
    MinTransferTime,
}

impl Objective {
    /// Lower is better.
    fn score(&self, candidate: &TransferCandidate, first_departure: f64) -> f64 {
        match self {
            Objective::FirstFeasible => 0.0,
            Objective::MinDeltaV => candidate.delta_v,
            Objective::MinTransferTime => candidate.elapsed_since(first_departure),
        }
    }
}

impl FromStr for Objective {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "first-feasible" => Ok(Objective::FirstFeasible),
            "min-delta-v" => Ok(Objective::MinDeltaV),
            "min-transfer-time" => Ok(Objective::MinTransferTime),
            _ => Err(PlannerError::InvalidConfiguration(format!(
                "unrecognized objective {:?}",
                s
            ))),
        }
    }
}

impl Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Objective::FirstFeasible => "first-feasible",
            Objective::MinDeltaV => "min-delta-v",
            Objective::MinTransferTime => "min-transfer-time",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
pub struct SearchConfiguration {
    pub objective: Objective,
    /// Number of samples along each axis of the grid.
    pub step_count: usize,
    /// No departure is considered sooner than this many seconds from now.
    pub max_search_horizon: f64,
}

impl Default for SearchConfiguration {
    fn default() -> Self {
        Self {
            objective: Objective::MinDeltaV,
            step_count: 60,
            max_search_horizon: 60.0,
        }
    }
}

impl SearchConfiguration {
    pub fn validate(&self) -> PlannerResult<()> {
        if self.step_count == 0 {
            return Err(PlannerError::InvalidConfiguration(
                "step count must be positive".to_owned(),
            ));
        }
        if !self.max_search_horizon.is_finite() || self.max_search_horizon < 0.0 {
            return Err(PlannerError::InvalidConfiguration(format!(
                "search horizon must be finite and non-negative, got {}",
                self.max_search_horizon
            )));
        }
        Ok(())
    }
}

/// One feasible solution of the search: a burn at `departure_time` that
/// coasts onto the target after `transfer_duration`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferCandidate {
    pub departure_time: f64,
    pub transfer_duration: f64,
    pub semimajor_axis: f64,
    pub departure_velocity: Vector3<f64>,
    /// Change from the vehicle's coasting velocity at departure.
    pub delta_v_vector: Vector3<f64>,
    pub delta_v: f64,
}

impl TransferCandidate {
    pub fn arrival_time(&self) -> f64 {
        self.departure_time + self.transfer_duration
    }

    pub fn elapsed_since(&self, start: f64) -> f64 {
        self.departure_time - start + self.transfer_duration
    }
}

/// The sample points of a search, scanned departure-major.
#[derive(Debug, Clone)]
pub struct SearchGrid {
    departure_times: Vec<f64>,
    transfer_durations: Vec<f64>,
}

impl SearchGrid {
    pub fn new(departure_times: Vec<f64>, transfer_durations: Vec<f64>) -> Self {
        Self {
            departure_times,
            transfer_durations,
        }
    }

    /// A single cell.
    pub fn single(departure_time: f64, transfer_duration: f64) -> Self {
        Self::new(vec![departure_time], vec![transfer_duration])
    }

    /// Departures over one period, starting `max_search_horizon` after
    /// `now`, and flight times over one period. Zero flight time is left
    /// out, since it's never feasible.
    pub fn spanning_period(now: f64, period: f64, config: &SearchConfiguration) -> Self {
        let n = config.step_count;
        let step = period / n as f64;
        let first_departure = now + config.max_search_horizon;

        Self::new(
            (0..n).map(|i| first_departure + i as f64 * step).collect(),
            (1..=n).map(|j| j as f64 * step).collect(),
        )
    }

    pub fn departure_times(&self) -> &[f64] {
        &self.departure_times
    }

    pub fn transfer_durations(&self) -> &[f64] {
        &self.transfer_durations
    }

    pub fn num_cells(&self) -> usize {
        self.departure_times.len() * self.transfer_durations.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOutcome {
    /// The flight time was outside the feasible window for this geometry.
    Infeasible,
    /// Feasible, and either became the new best or didn't.
    Feasible { accepted: bool },
}

/// Handed to the per-cell hook after each cell is evaluated.
#[derive(Debug, Clone, Copy)]
pub struct CellReport {
    pub departure_time: f64,
    pub transfer_duration: f64,
    pub outcome: CellOutcome,
}

/// Plans transfers from a coasting vehicle to a moving target.
pub struct TrajectorySearch<'a, V, T> {
    vehicle: &'a V,
    target: &'a T,
    mu: f64,
}

impl<'a, V, T> TrajectorySearch<'a, V, T>
where
    V: VehicleEphemeris,
    T: TargetEphemeris,
{
    pub fn new(vehicle: &'a V, target: &'a T, mu: f64) -> Self {
        Self {
            vehicle,
            target,
            mu,
        }
    }

    /// Searches departures over the next orbit of the vehicle.
    ///
    /// `on_cell` is called once after every cell, which is the place to give
    /// the host a chance to run. Search stops early only for
    /// [Objective::FirstFeasible].
    pub fn plan(
        &self,
        now: f64,
        config: &SearchConfiguration,
        on_cell: impl FnMut(&CellReport),
    ) -> PlannerResult<TransferCandidate> {
        config.validate()?;

        let state = self.vehicle.state_at(now)?;
        let shape = OrbitShape::from_state(&state, PointMass::with_mu(self.mu))?;
        let grid = SearchGrid::spanning_period(now, shape.period, config);

        self.run(&grid, config.objective, on_cell)
    }

    pub fn run(
        &self,
        grid: &SearchGrid,
        objective: Objective,
        mut on_cell: impl FnMut(&CellReport),
    ) -> PlannerResult<TransferCandidate> {
        let first_departure = match grid.departure_times.first() {
            Some(&t) => t,
            None => return Err(PlannerError::NoFeasibleTransferInWindow { cells: 0 }),
        };
        debug!(
            "searching {} cells for {} starting at t = {}",
            grid.num_cells(),
            objective,
            first_departure
        );

        let mut best: Option<(TransferCandidate, f64)> = None;
        let mut cells = 0;

        for &departure_time in &grid.departure_times {
            for &transfer_duration in &grid.transfer_durations {
                cells += 1;
                let candidate = self.evaluate(departure_time, transfer_duration)?;

                let outcome = match candidate {
                    None => CellOutcome::Infeasible,
                    Some(candidate) => {
                        let score = objective.score(&candidate, first_departure);
                        let accepted = match best {
                            None => true,
                            Some((_, best_score)) => score < best_score,
                        };
                        if accepted {
                            debug!(
                                "new best: depart {} for {} s, delta-v {}",
                                departure_time, transfer_duration, candidate.delta_v
                            );
                            best = Some((candidate, score));
                        }
                        CellOutcome::Feasible { accepted }
                    }
                };
                trace!(
                    "cell ({}, {}): {:?}",
                    departure_time,
                    transfer_duration,
                    outcome
                );

                on_cell(&CellReport {
                    departure_time,
                    transfer_duration,
                    outcome,
                });

                if objective == Objective::FirstFeasible {
                    if let Some((candidate, _)) = best {
                        return Ok(candidate);
                    }
                }
            }
        }

        match best {
            Some((candidate, _)) => Ok(candidate),
            None => {
                warn!("no feasible transfer in {} cells", cells);
                Err(PlannerError::NoFeasibleTransferInWindow { cells })
            }
        }
    }

    /// Solves one cell, or returns `None` if its flight time can't be flown
    /// on an ellipse. Cells within
    /// [DEGENERATE_ANGLE_TOLERANCE](super::lambert::DEGENERATE_ANGLE_TOLERANCE)
    /// degrees of a 180 degree transfer are also `None`, since their
    /// solutions miss.
    pub fn evaluate(
        &self,
        departure_time: f64,
        transfer_duration: f64,
    ) -> PlannerResult<Option<TransferCandidate>> {
        let state = self.vehicle.state_at(departure_time)?;
        let arrival = self.target.position_at(departure_time + transfer_duration);

        let normal = state.angular_momentum();
        let problem = LambertProblem::new(state.position, arrival, &normal, self.mu);
        if problem.is_degenerate()
            || !problem.feasible_window().contains_strictly(transfer_duration)
        {
            return Ok(None);
        }

        let solution = problem.solve(transfer_duration)?;
        let departure_velocity = solution.departure_velocity;
        if !departure_velocity.iter().all(|x| x.is_finite()) {
            return Ok(None);
        }

        let delta_v_vector = departure_velocity - state.velocity;
        Ok(Some(TransferCandidate {
            departure_time,
            transfer_duration,
            semimajor_axis: solution.semimajor_axis,
            departure_velocity,
            delta_v_vector,
            delta_v: delta_v_vector.norm(),
        }))
    }
}
