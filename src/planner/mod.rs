//! Transfer planning: Lambert's problem, the search that drives it, and the
//! burn sizing that turns its answer into something a vehicle can fly.

pub mod burn;
pub mod guidance;
pub mod lambert;
pub mod search;

pub use burn::{estimate_burn_duration, ManeuverPlan, Propulsion};
pub use guidance::{BrakingGuidance, GuidanceCommand};
pub use lambert::{LambertProblem, LambertSolution};
pub use search::{
    CellOutcome, CellReport, Objective, SearchConfiguration, SearchGrid, TrajectorySearch,
    TransferCandidate,
};
