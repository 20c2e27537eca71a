//! shuttle-planner core
//!
//! Orders two pickup/drop-off pairs into the shortest feasible visiting
//! sequence and resolves cached walking geometry for each leg.

pub mod error;
pub mod traits;
pub mod location;
pub mod registry;
pub mod distance;
pub mod precedence;
pub mod solver;
pub mod geometry;
pub mod cache;
pub mod osrm;
pub mod ors;
pub mod planner;

pub use error::{CacheError, ProviderError, RouteError};
pub use location::Location;
pub use solver::{optimize, StopSequence, TripRequest};
