//! Test fixtures for shuttle-planner.
//!
//! Provides:
//! - small synthetic registries with hand-checkable distances
//! - stub routing providers that count calls
//! - a brute-force reference for checking optimizer output

#![allow(dead_code)]

pub mod reference;
pub mod stub_provider;

pub use reference::*;
pub use stub_provider::*;

use shuttle_planner::registry::WaypointRegistry;
use shuttle_planner::Location;

/// A(0,0), B(1,0), C(1,1), D(0,1).
pub fn unit_square() -> WaypointRegistry {
    let mut registry = WaypointRegistry::new();
    registry.insert("A", (0.0, 0.0));
    registry.insert("B", (1.0, 0.0));
    registry.insert("C", (1.0, 1.0));
    registry.insert("D", (0.0, 1.0));
    registry
}

/// Five points on a line, one unit apart: p, q, r, s, t.
pub fn line() -> WaypointRegistry {
    ["p", "q", "r", "s", "t"]
        .iter()
        .enumerate()
        .map(|(i, name)| (Location::new(name), (0.0, i as f64)))
        .collect()
}

pub fn names(stops: &[Location]) -> Vec<&str> {
    stops.iter().map(Location::name).collect()
}
