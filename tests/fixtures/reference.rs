//! Brute-force reference for the sequencing optimizer.
//!
//! Deliberately naive: enumerates every permutation by swapping, with no
//! shared code with the library's enumeration.

use shuttle_planner::registry::WaypointRegistry;
use shuttle_planner::traits::CoordinateRegistry;
use shuttle_planner::{Location, TripRequest};

/// Distinct stops of a request, excluding the continuation.
pub fn distinct_stops(request: &TripRequest) -> Vec<Location> {
    let mut stops = Vec::new();
    for stop in [
        &request.pickup_a,
        &request.pickup_b,
        &request.dropoff_a,
        &request.dropoff_b,
    ] {
        if request.continuation.as_ref() != Some(stop) && !stops.contains(stop) {
            stops.push(stop.clone());
        }
    }
    stops
}

/// Every ordering of `items`.
pub fn permutations(items: &[Location]) -> Vec<Vec<Location>> {
    let mut out = Vec::new();
    let mut working = items.to_vec();
    permute(&mut working, 0, &mut out);
    out
}

fn permute(items: &mut Vec<Location>, k: usize, out: &mut Vec<Vec<Location>>) {
    if k == items.len() {
        out.push(items.clone());
        return;
    }
    for i in k..items.len() {
        items.swap(k, i);
        permute(items, k + 1, out);
        items.swap(k, i);
    }
}

/// Full candidate sequence: continuation (if any) then the permuted stops.
pub fn with_continuation(request: &TripRequest, order: Vec<Location>) -> Vec<Location> {
    request.continuation.iter().cloned().chain(order).collect()
}

pub fn respects_precedence(request: &TripRequest, sequence: &[Location]) -> bool {
    let pos = |location: &Location| sequence.iter().position(|stop| stop == location);
    let ok = |pickup: &Location, dropoff: &Location| match (pos(pickup), pos(dropoff)) {
        (Some(p), Some(d)) => p <= d,
        _ => false,
    };
    ok(&request.pickup_a, &request.dropoff_a) && ok(&request.pickup_b, &request.dropoff_b)
}

pub fn euclidean_cost(registry: &WaypointRegistry, sequence: &[Location]) -> f64 {
    sequence
        .windows(2)
        .map(|pair| {
            let (x1, y1) = registry.coordinate_of(&pair[0]).unwrap();
            let (x2, y2) = registry.coordinate_of(&pair[1]).unwrap();
            ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt()
        })
        .sum()
}

/// Cheapest feasible cost by exhaustive search, or `None` if nothing is feasible.
pub fn brute_force_min(registry: &WaypointRegistry, request: &TripRequest) -> Option<f64> {
    permutations(&distinct_stops(request))
        .into_iter()
        .map(|order| with_continuation(request, order))
        .filter(|sequence| respects_precedence(request, sequence))
        .map(|sequence| euclidean_cost(registry, &sequence))
        .fold(None, |best: Option<f64>, cost| {
            Some(best.map_or(cost, |b| b.min(cost)))
        })
}
