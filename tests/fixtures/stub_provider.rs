//! Deterministic routing providers that never touch the network.

use std::sync::Mutex;

use shuttle_planner::error::ProviderError;
use shuttle_planner::geometry::PathGeometry;
use shuttle_planner::traits::RoutingProvider;

#[derive(Debug, Clone, Copy)]
enum StubResponse {
    StraightLine,
    Empty,
    ServiceError,
}

/// Returns a straight line between the requested coordinates, or a
/// pre-configured failure, and records every request.
#[derive(Debug)]
pub struct StubProvider {
    response: StubResponse,
    requests: Mutex<Vec<Vec<(f64, f64)>>>,
}

impl StubProvider {
    pub fn straight_line() -> Self {
        Self::with_response(StubResponse::StraightLine)
    }

    pub fn empty() -> Self {
        Self::with_response(StubResponse::Empty)
    }

    pub fn failing() -> Self {
        Self::with_response(StubResponse::ServiceError)
    }

    fn with_response(response: StubResponse) -> Self {
        Self {
            response,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Vec<(f64, f64)>> {
        self.requests.lock().unwrap().clone()
    }
}

impl RoutingProvider for StubProvider {
    fn resolve_path(&self, coordinates: &[(f64, f64)]) -> Result<PathGeometry, ProviderError> {
        self.requests.lock().unwrap().push(coordinates.to_vec());

        match self.response {
            StubResponse::StraightLine => Ok(straight_line(coordinates)),
            StubResponse::Empty => Ok(PathGeometry::new(Vec::new())),
            StubResponse::ServiceError => Err(ProviderError::Service {
                code: "NoRoute".to_string(),
                message: "Impossible route between points".to_string(),
            }),
        }
    }
}

/// (lat, lon) input flipped into (lon, lat) geometry points.
pub fn straight_line(coordinates: &[(f64, f64)]) -> PathGeometry {
    PathGeometry::new(coordinates.iter().map(|&(lat, lon)| (lon, lat)).collect())
}
