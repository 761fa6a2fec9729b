// error.rs
use crate::intersection::direction::{Direction, Route};
use crate::intersection::registry::OccupantId;
use thiserror::Error;

/// Every loud failure of the intersection monitor.
///
/// None of these are retried internally: they are either caller contract
/// violations or an exhausted capacity bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntersectionError {
    #[error("intersection capacity must be at least one vehicle")]
    ZeroCapacity,

    #[error("route {0} -> {0} is a u-turn; origin and destination must differ")]
    UTurn(Direction),

    #[error("admitting another vehicle would exceed the capacity of {capacity} occupants")]
    CapacityExceeded { capacity: usize },

    #[error("exit of {route} does not match any vehicle in the intersection")]
    UnmatchedExit { route: Route },

    #[error("occupant {0} is not in the intersection")]
    UnknownOccupant(OccupantId),

    #[error("teardown with {count} vehicle(s) still in the intersection")]
    OccupantsRemaining { count: usize },

    #[error("intersection lock poisoned by a panicking vehicle")]
    Poisoned,
}

/// Failures of the simulation driver.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("could not read config {}: {source}", path.display())]
    ConfigIo {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Intersection(#[from] IntersectionError),

    #[error("vehicle worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("csv export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("{count} unsafe admission(s) observed, first between {first:?}")]
    SafetyViolation { count: usize, first: (Route, Route) },
}
