use thiserror::Error;

use crate::math::root_finding::RootFindingError;

pub type PlannerResult<T> = Result<T, PlannerError>;

/// Everything that can go wrong while planning a transfer. None of these are
/// retried internally; deciding whether to try again with a wider window is
/// up to the caller.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlannerError {
    #[error("transfer duration {duration} s is outside the feasible window ({min} s, {max} s)")]
    InfeasibleTransfer { duration: f64, min: f64, max: f64 },

    #[error("no feasible transfer found in {cells} searched cells")]
    NoFeasibleTransferInWindow { cells: usize },

    #[error("invalid search configuration: {0}")]
    InvalidConfiguration(String),

    #[error("vehicle orbit is not elliptical (e = {eccentricity})")]
    UnboundOrbit { eccentricity: f64 },

    #[error(transparent)]
    ConvergenceFailure(#[from] RootFindingError),
}
