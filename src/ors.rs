//! OpenRouteService directions adapter.
//!
//! Requests a walking route as GeoJSON and takes the first feature's line.

use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ProviderError;
use crate::geometry::PathGeometry;
use crate::traits::RoutingProvider;

/// Environment variable holding the OpenRouteService API key.
pub const API_KEY_ENV: &str = "OPENROUTESERVICE_API_KEY";

#[derive(Debug, Clone)]
pub struct OrsConfig {
    pub base_url: String,
    pub profile: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for OrsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openrouteservice.org".to_string(),
            profile: "foot-walking".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

impl OrsConfig {
    /// Default config with the API key read from [`API_KEY_ENV`].
    pub fn from_env() -> Result<Self, ProviderError> {
        let api_key = env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingApiKey(API_KEY_ENV.to_string()))?;

        Ok(Self {
            api_key,
            ..Self::default()
        })
    }
}

#[derive(Debug, Clone)]
pub struct OrsClient {
    config: OrsConfig,
    client: reqwest::blocking::Client,
}

impl OrsClient {
    pub fn new(config: OrsConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::MissingApiKey(API_KEY_ENV.to_string()));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn directions_url(&self) -> String {
        format!(
            "{}/v2/directions/{}/geojson",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile
        )
    }
}

impl RoutingProvider for OrsClient {
    fn resolve_path(&self, coordinates: &[(f64, f64)]) -> Result<PathGeometry, ProviderError> {
        if coordinates.len() < 2 {
            return Err(ProviderError::TooFewCoordinates(coordinates.len()));
        }

        let request = DirectionsRequest {
            coordinates: coordinates.iter().map(|&(lat, lng)| [lng, lat]).collect(),
        };

        let response = self
            .client
            .post(self.directions_url())
            .header(reqwest::header::AUTHORIZATION, &self.config.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(ProviderError::Service {
                code: status.as_u16().to_string(),
                message,
            });
        }

        let geometry = convert_response(response.json::<FeatureCollection>()?)?;
        info!(points = geometry.len(), "resolved path via OpenRouteService");
        Ok(geometry)
    }
}

fn convert_response(body: FeatureCollection) -> Result<PathGeometry, ProviderError> {
    body.features
        .into_iter()
        .next()
        .map(|feature| feature.geometry.coordinates)
        .filter(|points| !points.is_empty())
        .map(|points| PathGeometry::new(points.into_iter().map(|[lng, lat]| (lng, lat)).collect()))
        .ok_or(ProviderError::NoGeometry)
}

#[derive(Debug, Serialize)]
struct DirectionsRequest {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: LineString,
}

#[derive(Debug, Deserialize)]
struct LineString {
    coordinates: Vec<[f64; 2]>,
}
