//! Capability seams for the route planner.
//!
//! The optimizer and the orchestration layer only talk to their collaborators
//! through these traits. Concrete apps can supply their own registry,
//! provider or cache backend.

use crate::cache::CacheEntry;
use crate::error::{CacheError, ProviderError, RouteError};
use crate::geometry::PathGeometry;
use crate::location::Location;

/// Resolves named locations to fixed coordinates.
pub trait CoordinateRegistry {
    /// Coordinate (lat, lon) for a location, or `None` if it is not registered.
    fn coordinate_of(&self, location: &Location) -> Option<(f64, f64)>;
}

impl<T: CoordinateRegistry + ?Sized> CoordinateRegistry for &T {
    fn coordinate_of(&self, location: &Location) -> Option<(f64, f64)> {
        (**self).coordinate_of(location)
    }
}

/// Heuristic distance between two named locations.
///
/// Implementations must never return a negative value.
pub trait DistanceEstimator {
    fn distance(&self, from: &Location, to: &Location) -> Result<f64, RouteError>;
}

/// Resolves the walking path through an ordered list of coordinates.
pub trait RoutingProvider: Send + Sync {
    /// Coordinates are (lat, lon); the returned geometry is (lon, lat).
    fn resolve_path(&self, coordinates: &[(f64, f64)]) -> Result<PathGeometry, ProviderError>;
}

/// Durable store of resolved geometries keyed by directed stop pair.
///
/// Concurrent lookups never observe a partially written entry. A successful
/// `store` is durable before it returns.
pub trait GeometryCache: Send + Sync {
    /// Exact directed match only: `(a, b)` never satisfies `(b, a)`.
    fn lookup(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> Result<Option<PathGeometry>, CacheError>;

    /// Insert or replace the entry for `(origin, destination)`.
    fn store(
        &self,
        origin: &Location,
        destination: &Location,
        geometry: &PathGeometry,
    ) -> Result<(), CacheError>;

    /// Every entry, ordered by key.
    fn all_entries(&self) -> Result<Vec<CacheEntry>, CacheError>;
}
