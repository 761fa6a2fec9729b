pub mod error;
pub mod intersection;
pub mod simulation_engine;

pub use error::{IntersectionError, SimulationError};
pub use intersection::controller::IntersectionController;
pub use intersection::direction::{Direction, Route};
pub use intersection::registry::OccupantId;
