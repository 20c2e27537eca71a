//! Orchestration: optimize a trip, then resolve geometry for every leg.
//!
//! Each leg is looked up in the cache first. On a miss the routing provider
//! resolves it and the result is stored before the plan is returned. Legs are
//! resolved in parallel; the cache guarantees whole-entry writes, so
//! concurrent plans sharing a leg are safe.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::distance::EuclideanDistance;
use crate::error::{ProviderError, RouteError, RouteResult};
use crate::geometry::PathGeometry;
use crate::location::Location;
use crate::solver::{optimize, StopSequence, TripRequest};
use crate::traits::{CoordinateRegistry, GeometryCache, RoutingProvider};

/// Geometry for one consecutive pair of stops.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub origin: Location,
    pub destination: Location,
    pub geometry: PathGeometry,
    /// True if the geometry came from the cache rather than the provider.
    pub from_cache: bool,
}

/// An optimized stop order with resolved leg geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRoute {
    pub stops: StopSequence,
    pub legs: Vec<RouteLeg>,
}

impl PlannedRoute {
    /// All legs joined into a single line.
    pub fn geometry(&self) -> PathGeometry {
        PathGeometry::concat(self.legs.iter().map(|leg| &leg.geometry))
    }

    /// Where this trip ends; pass it as the next request's continuation.
    pub fn last_location(&self) -> Option<&Location> {
        self.stops.last()
    }
}

pub struct RoutePlanner<R, C, P> {
    registry: R,
    cache: C,
    provider: P,
}

impl<R, C, P> RoutePlanner<R, C, P>
where
    R: CoordinateRegistry + Sync,
    C: GeometryCache,
    P: RoutingProvider,
{
    pub fn new(registry: R, cache: C, provider: P) -> Self {
        Self {
            registry,
            cache,
            provider,
        }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Optimize the request and resolve geometry for each leg of the result.
    pub fn plan(&self, request: &TripRequest) -> RouteResult<PlannedRoute> {
        let stops = optimize(request, &EuclideanDistance::new(&self.registry))?;

        let pairs: Vec<(&Location, &Location)> = stops.legs().collect();
        let legs = pairs
            .par_iter()
            .map(|&(origin, destination)| self.resolve_leg(origin, destination))
            .collect::<Result<Vec<_>, _>>()?;

        let fetched = legs.iter().filter(|leg| !leg.from_cache).count();
        debug!(legs = legs.len(), fetched, cost = stops.cost(), "planned route");

        Ok(PlannedRoute { stops, legs })
    }

    /// Cached geometry for one leg, falling back to the provider.
    pub fn resolve_leg(
        &self,
        origin: &Location,
        destination: &Location,
    ) -> RouteResult<RouteLeg> {
        if let Some(geometry) = self.cache.lookup(origin, destination)? {
            return Ok(RouteLeg {
                origin: origin.clone(),
                destination: destination.clone(),
                geometry,
                from_cache: true,
            });
        }

        let coordinates = [self.coordinate(origin)?, self.coordinate(destination)?];
        let geometry = self.provider.resolve_path(&coordinates)?;
        if geometry.is_empty() {
            return Err(ProviderError::NoGeometry.into());
        }

        self.cache.store(origin, destination, &geometry)?;
        info!(%origin, %destination, points = geometry.len(), "resolved and cached leg");

        Ok(RouteLeg {
            origin: origin.clone(),
            destination: destination.clone(),
            geometry,
            from_cache: false,
        })
    }

    fn coordinate(&self, location: &Location) -> RouteResult<(f64, f64)> {
        self.registry
            .coordinate_of(location)
            .ok_or_else(|| RouteError::UnknownLocation(location.name().to_string()))
    }
}
