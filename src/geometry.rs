//! Walking path geometry.
//!
//! Points are stored as (longitude, latitude), the order used by GeoJSON and
//! by the routing services. Coordinates handed *to* a provider are (lat, lon).

use serde::{Deserialize, Serialize};

/// An ordered walking path between stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathGeometry {
    points: Vec<(f64, f64)>,
}

impl PathGeometry {
    /// Each point is a (longitude, latitude) tuple.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Join consecutive leg geometries into one line.
    ///
    /// When a leg starts where the previous one ended, the shared point is
    /// kept once.
    pub fn concat<'a>(legs: impl IntoIterator<Item = &'a PathGeometry>) -> Self {
        let mut points: Vec<(f64, f64)> = Vec::new();
        for leg in legs {
            let skip = match (points.last(), leg.points.first()) {
                (Some(last), Some(first)) if last == first => 1,
                _ => 0,
            };
            points.extend(leg.points.iter().skip(skip).copied());
        }
        Self { points }
    }
}
