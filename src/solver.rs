//! Route sequencing optimizer.
//!
//! With two passengers there are at most four stops to order, so every
//! permutation is scored and the cheapest one that keeps each pickup ahead of
//! its drop-off wins. Permutations are enumerated in lexicographic order over
//! the request's stop list, and ties keep the first candidate, so results are
//! reproducible.

use tracing::debug;

use crate::error::RouteError;
use crate::location::Location;
use crate::precedence::{PassengerLeg, Precedence};
use crate::traits::DistanceEstimator;

/// Two pickup/drop-off pairs, optionally continuing from where the vehicle is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripRequest {
    pub pickup_a: Location,
    pub pickup_b: Location,
    pub dropoff_a: Location,
    pub dropoff_b: Location,
    /// Where the previous trip ended. Always the first stop, never permuted.
    ///
    /// A stop equal to the continuation is treated as already visited. If it
    /// is a drop-off whose pickup is elsewhere, that pickup can never precede
    /// it and [`optimize`] fails with [`RouteError::InfeasibleRequest`].
    pub continuation: Option<Location>,
}

impl TripRequest {
    pub fn new(
        pickup_a: impl Into<Location>,
        pickup_b: impl Into<Location>,
        dropoff_a: impl Into<Location>,
        dropoff_b: impl Into<Location>,
    ) -> Self {
        Self {
            pickup_a: pickup_a.into(),
            pickup_b: pickup_b.into(),
            dropoff_a: dropoff_a.into(),
            dropoff_b: dropoff_b.into(),
            continuation: None,
        }
    }

    pub fn with_continuation(mut self, location: impl Into<Location>) -> Self {
        self.continuation = Some(location.into());
        self
    }

    pub fn passengers(&self) -> [PassengerLeg; 2] {
        [
            PassengerLeg::new(self.pickup_a.clone(), self.dropoff_a.clone()),
            PassengerLeg::new(self.pickup_b.clone(), self.dropoff_b.clone()),
        ]
    }

    /// Distinct stops to permute, in input order.
    ///
    /// Coinciding stops collapse into one, and a stop equal to the
    /// continuation is dropped since the vehicle is already there.
    pub fn permuted_stops(&self) -> Vec<Location> {
        let mut stops: Vec<Location> = Vec::with_capacity(4);
        for stop in [&self.pickup_a, &self.pickup_b, &self.dropoff_a, &self.dropoff_b] {
            if self.continuation.as_ref() == Some(stop) || stops.contains(stop) {
                continue;
            }
            stops.push(stop.clone());
        }
        stops
    }
}

/// An ordered visiting sequence and its route cost.
#[derive(Debug, Clone, PartialEq)]
pub struct StopSequence {
    stops: Vec<Location>,
    cost: f64,
}

impl StopSequence {
    pub fn stops(&self) -> &[Location] {
        &self.stops
    }

    /// Sum of estimated distances between consecutive stops.
    pub fn cost(&self) -> f64 {
        self.cost
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Consecutive (origin, destination) pairs.
    pub fn legs(&self) -> impl Iterator<Item = (&Location, &Location)> {
        self.stops.windows(2).map(|pair| (&pair[0], &pair[1]))
    }

    /// Final stop; the continuation for the next trip.
    pub fn last(&self) -> Option<&Location> {
        self.stops.last()
    }
}

/// Find the cheapest visiting order that satisfies both passengers.
///
/// Every location is validated before any permutation is scored, so an
/// unregistered name fails with [`RouteError::UnknownLocation`] up front.
pub fn optimize<D>(request: &TripRequest, estimator: &D) -> Result<StopSequence, RouteError>
where
    D: DistanceEstimator,
{
    let mut best: Option<StopSequence> = None;
    for candidate in feasible_sequences(request, estimator)? {
        if best.as_ref().is_none_or(|current| candidate.cost < current.cost) {
            best = Some(candidate);
        }
    }

    let best = best.ok_or(RouteError::InfeasibleRequest)?;
    debug!(stops = ?best.stops, cost = best.cost, "selected stop order");
    Ok(best)
}

/// Every precedence-feasible sequence, scored, in enumeration order.
pub fn feasible_sequences<D>(
    request: &TripRequest,
    estimator: &D,
) -> Result<Vec<StopSequence>, RouteError>
where
    D: DistanceEstimator,
{
    let stops = request.permuted_stops();
    let mut nodes: Vec<Location> = request.continuation.iter().cloned().collect();
    let offset = nodes.len();
    nodes.extend(stops.iter().cloned());

    let matrix = distance_matrix(&nodes, estimator)?;
    let precedence = Precedence::new(request.passengers());

    let mut order: Vec<usize> = (0..stops.len()).collect();
    let mut feasible = Vec::new();
    loop {
        let path: Vec<usize> = (0..offset).chain(order.iter().map(|i| i + offset)).collect();
        let sequence: Vec<Location> = path.iter().map(|&i| nodes[i].clone()).collect();

        if precedence.is_satisfied(&sequence) {
            feasible.push(StopSequence {
                stops: sequence,
                cost: path_cost(&path, &matrix),
            });
        }

        if !next_permutation(&mut order) {
            break;
        }
    }

    Ok(feasible)
}

/// Route cost of an arbitrary sequence; 0 for fewer than two stops.
pub fn route_cost<D>(stops: &[Location], estimator: &D) -> Result<f64, RouteError>
where
    D: DistanceEstimator,
{
    stops
        .windows(2)
        .map(|pair| estimator.distance(&pair[0], &pair[1]))
        .sum()
}

fn distance_matrix<D>(nodes: &[Location], estimator: &D) -> Result<Vec<Vec<f64>>, RouteError>
where
    D: DistanceEstimator,
{
    // Includes the diagonal so that every node is resolved at least once.
    nodes
        .iter()
        .map(|from| nodes.iter().map(|to| estimator.distance(from, to)).collect())
        .collect()
}

fn path_cost(path: &[usize], matrix: &[Vec<f64>]) -> f64 {
    path.windows(2).map(|pair| matrix[pair[0]][pair[1]]).sum()
}

/// Advance to the next lexicographic permutation; false once exhausted.
fn next_permutation(order: &mut [usize]) -> bool {
    if order.len() < 2 {
        return false;
    }

    let mut i = order.len() - 1;
    while i > 0 && order[i - 1] >= order[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }

    let mut j = order.len() - 1;
    while order[j] <= order[i - 1] {
        j -= 1;
    }
    order.swap(i - 1, j);
    order[i..].reverse();
    true
}
