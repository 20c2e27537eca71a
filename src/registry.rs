//! Static waypoint registry.
//!
//! Maps location names to (lat, lon). The registry is read-only once built
//! and is shared freely between requests.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::location::Location;
use crate::traits::CoordinateRegistry;

/// Campus waypoints served by the shuttle.
const CAMPUS_WAYPOINTS: &[(&str, f64, f64)] = &[
    ("basketball court", 17.282128, 78.554006),
    ("canteen", 17.281891, 78.553765),
    ("mv block", 17.282433, 78.553351),
    ("library", 17.282258, 78.553091),
    ("sv block", 17.282838, 78.553278),
    ("stationary", 17.283381, 78.553252),
    ("beach volleyball", 17.282488, 78.553999),
    ("cricket ground", 17.282633, 78.553839),
    ("games block", 17.283233, 78.552779),
    ("volleyball court", 17.283027, 78.552684),
    ("small gate", 17.281913, 78.553885),
    ("main gate", 17.280449, 78.553885),
];

/// In-memory name → coordinate table.
#[derive(Debug, Clone, Default)]
pub struct WaypointRegistry {
    waypoints: BTreeMap<Location, (f64, f64)>,
}

impl WaypointRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in campus waypoint table.
    pub fn campus() -> Self {
        CAMPUS_WAYPOINTS
            .iter()
            .map(|&(name, lat, lon)| (Location::new(name), (lat, lon)))
            .collect()
    }

    /// Parse a JSON object of the form `{"name": [lat, lon], ...}`.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let raw: BTreeMap<String, RawCoordinate> = serde_json::from_str(json)?;
        Ok(raw
            .into_iter()
            .map(|(name, RawCoordinate(lat, lon))| (Location::new(name), (lat, lon)))
            .collect())
    }

    pub fn insert(&mut self, location: impl Into<Location>, coordinate: (f64, f64)) {
        self.waypoints.insert(location.into(), coordinate);
    }

    pub fn contains(&self, location: &Location) -> bool {
        self.waypoints.contains_key(location)
    }

    /// Registered locations in name order.
    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.waypoints.keys()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }
}

#[derive(Deserialize)]
struct RawCoordinate(f64, f64);

impl FromIterator<(Location, (f64, f64))> for WaypointRegistry {
    fn from_iter<I: IntoIterator<Item = (Location, (f64, f64))>>(iter: I) -> Self {
        Self {
            waypoints: iter.into_iter().collect(),
        }
    }
}

impl CoordinateRegistry for WaypointRegistry {
    fn coordinate_of(&self, location: &Location) -> Option<(f64, f64)> {
        self.waypoints.get(location).copied()
    }
}
