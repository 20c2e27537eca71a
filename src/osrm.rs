//! OSRM HTTP adapter for walking geometry.

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ProviderError;
use crate::geometry::PathGeometry;
use crate::traits::RoutingProvider;

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "foot".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, ProviderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    /// `{base}/route/v1/{profile}/{lon,lat;...}` with full GeoJSON overview.
    fn route_url(&self, coordinates: &[(f64, f64)]) -> String {
        let coords = coordinates
            .iter()
            .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}?overview=full&geometries=geojson",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }
}

impl RoutingProvider for OsrmClient {
    fn resolve_path(&self, coordinates: &[(f64, f64)]) -> Result<PathGeometry, ProviderError> {
        if coordinates.len() < 2 {
            return Err(ProviderError::TooFewCoordinates(coordinates.len()));
        }

        let url = self.route_url(coordinates);
        let response = self.client.get(&url).send()?;

        // OSRM reports NoRoute, InvalidQuery and friends as 4xx with a JSON body.
        let status_error = response.error_for_status_ref().err();
        let body = match status_error {
            None => response.json::<OsrmRouteResponse>()?,
            Some(status_error) => {
                let text = response.text()?;
                match serde_json::from_str::<OsrmRouteResponse>(&text) {
                    Ok(body) if body.code != "Ok" => body,
                    _ => return Err(status_error.into()),
                }
            }
        };

        let geometry = convert_response(body)?;
        info!(points = geometry.len(), "resolved path via OSRM");
        Ok(geometry)
    }
}

fn convert_response(body: OsrmRouteResponse) -> Result<PathGeometry, ProviderError> {
    if body.code != "Ok" {
        warn!(code = %body.code, "OSRM returned an error response");
        return Err(ProviderError::Service {
            code: body.code,
            message: body.message.unwrap_or_default(),
        });
    }

    body.routes
        .into_iter()
        .next()
        .map(|route| route.geometry.coordinates)
        .filter(|points| !points.is_empty())
        .map(|points| PathGeometry::new(points.into_iter().map(|[lng, lat]| (lng, lat)).collect()))
        .ok_or(ProviderError::NoGeometry)
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: LineString,
}

#[derive(Debug, Deserialize)]
struct LineString {
    coordinates: Vec<[f64; 2]>,
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    use super::*;

    fn client(base_url: &str) -> OsrmClient {
        OsrmClient::new(OsrmConfig {
            base_url: base_url.to_string(),
            ..OsrmConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_route_url_uses_lon_lat_order() {
        let url = client("http://osrm.example.com/")
            .route_url(&[(17.280449, 78.553885), (17.281891, 78.553765)]);
        assert_eq!(
            url,
            "http://osrm.example.com/route/v1/foot/78.553885,17.280449;78.553765,17.281891\
             ?overview=full&geometries=geojson"
        );
    }

    #[test]
    fn test_convert_success_response() {
        let body: OsrmRouteResponse = serde_json::from_str(
            r#"{
                "code": "Ok",
                "routes": [{"geometry": {"type": "LineString", "coordinates": [[78.55, 17.28], [78.56, 17.29]]}}]
            }"#,
        )
        .unwrap();
        let geometry = convert_response(body).unwrap();
        assert_eq!(geometry.points(), &[(78.55, 17.28), (78.56, 17.29)]);
    }

    #[test]
    fn test_convert_error_response() {
        let body: OsrmRouteResponse =
            serde_json::from_str(r#"{"code": "NoRoute", "message": "Impossible route"}"#).unwrap();
        let err = convert_response(body).unwrap_err();
        assert!(matches!(err, ProviderError::Service { code, .. } if code == "NoRoute"));
    }

    #[test]
    fn test_convert_empty_routes() {
        let body: OsrmRouteResponse = serde_json::from_str(r#"{"code": "Ok", "routes": []}"#).unwrap();
        assert!(matches!(convert_response(body), Err(ProviderError::NoGeometry)));
    }

    /// Serve one canned HTTP response on a local port.
    fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request).unwrap();
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_error_status_with_osrm_body_is_a_service_error() {
        let base = serve_once(
            "400 Bad Request",
            r#"{"code": "NoRoute", "message": "Impossible route between points"}"#,
        );
        let err = client(&base)
            .resolve_path(&[(17.280449, 78.553885), (17.281891, 78.553765)])
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Service { code, message }
                if code == "NoRoute" && message == "Impossible route between points"
        ));
    }

    #[test]
    fn test_error_status_without_osrm_body_is_an_http_error() {
        let base = serve_once("502 Bad Gateway", "upstream unavailable");
        let err = client(&base)
            .resolve_path(&[(17.280449, 78.553885), (17.281891, 78.553765)])
            .unwrap_err();
        assert!(matches!(err, ProviderError::Http(_)));
    }

    #[test]
    fn test_success_status_is_converted() {
        let base = serve_once(
            "200 OK",
            r#"{"code": "Ok", "routes": [{"geometry": {"coordinates": [[78.55, 17.28], [78.56, 17.29]]}}]}"#,
        );
        let geometry = client(&base)
            .resolve_path(&[(17.28, 78.55), (17.29, 78.56)])
            .unwrap();
        assert_eq!(geometry.len(), 2);
    }

    #[test]
    fn test_single_coordinate_is_rejected() {
        let err = client("http://localhost:5000")
            .resolve_path(&[(17.28, 78.55)])
            .unwrap_err();
        assert!(matches!(err, ProviderError::TooFewCoordinates(1)));
    }
}
