//! Straight-line distance estimator.
//!
//! Uses Euclidean distance between raw (lat, lon) coordinates as a cheap
//! stand-in for walking distance. It ignores paths entirely, so it is only
//! good for ranking candidate orders, never as a real path length.

use crate::error::RouteError;
use crate::location::Location;
use crate::traits::{CoordinateRegistry, DistanceEstimator};

/// Euclidean distance over a coordinate registry.
#[derive(Debug, Clone, Copy)]
pub struct EuclideanDistance<R> {
    registry: R,
}

impl<R: CoordinateRegistry> EuclideanDistance<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    fn coordinate(&self, location: &Location) -> Result<(f64, f64), RouteError> {
        self.registry
            .coordinate_of(location)
            .ok_or_else(|| RouteError::UnknownLocation(location.name().to_string()))
    }
}

impl<R: CoordinateRegistry> DistanceEstimator for EuclideanDistance<R> {
    fn distance(&self, from: &Location, to: &Location) -> Result<f64, RouteError> {
        let (lat1, lon1) = self.coordinate(from)?;
        let (lat2, lon2) = self.coordinate(to)?;
        Ok((lat2 - lat1).hypot(lon2 - lon1))
    }
}
