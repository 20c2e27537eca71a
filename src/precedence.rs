//! Pickup-before-drop-off constraints.

use crate::location::Location;

/// One passenger: picked up at `pickup`, dropped off at `dropoff`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassengerLeg {
    pub pickup: Location,
    pub dropoff: Location,
}

impl PassengerLeg {
    pub fn new(pickup: Location, dropoff: Location) -> Self {
        Self { pickup, dropoff }
    }
}

/// The set of per-passenger ordering constraints for one trip.
///
/// A pickup only has to come before its own drop-off; it need not be
/// immediately before it.
#[derive(Debug, Clone)]
pub struct Precedence {
    legs: Vec<PassengerLeg>,
}

impl Precedence {
    pub fn new(legs: impl IntoIterator<Item = PassengerLeg>) -> Self {
        Self {
            legs: legs.into_iter().collect(),
        }
    }

    /// True if every pickup appears no later than its drop-off.
    ///
    /// Positions may be equal only when a passenger's pickup and drop-off are
    /// the same collapsed stop. A stop missing from `sequence` fails the check.
    pub fn is_satisfied(&self, sequence: &[Location]) -> bool {
        self.legs.iter().all(|leg| {
            match (position(sequence, &leg.pickup), position(sequence, &leg.dropoff)) {
                (Some(pickup), Some(dropoff)) => pickup <= dropoff,
                _ => false,
            }
        })
    }
}

fn position(sequence: &[Location], location: &Location) -> Option<usize> {
    sequence.iter().position(|stop| stop == location)
}
