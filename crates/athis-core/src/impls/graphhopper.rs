//! GraphHopperClient - GraphHopper Routing API の HTTP アダプタ
//!
//! 1 回の `compute_route` につき外部呼び出しは最大 1 回。
//! 再試行は行わず、エラーの変換だけを担当します。

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::domain::{AthisError, GeoPoint, Result, RouteResult};
use crate::ports::RouteProvider;

pub const DEFAULT_BASE_URL: &str = "https://graphhopper.com/api/1";

/// Connection settings for [`GraphHopperClient`].
#[derive(Debug, Clone)]
pub struct GraphHopperSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub vehicle: String,
    pub timeout: Duration,
}

impl Default for GraphHopperSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            vehicle: "car".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub struct GraphHopperClient {
    client: Client,
    route_url: Url,
    api_key: String,
    vehicle: String,
}

impl GraphHopperClient {
    /// Fails with `Configuration` when the key is absent, blank or an
    /// unresolved `${VAR}` placeholder, or when the base URL is unusable.
    pub fn new(settings: GraphHopperSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && !key.starts_with("${"))
            .ok_or_else(|| AthisError::configuration("routing api key is not set"))?;

        let base = Url::parse(&settings.base_url).map_err(|e| {
            AthisError::configuration(format!("invalid routing base url '{}': {e}", settings.base_url))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(AthisError::configuration(format!(
                "unsupported routing url scheme: {}",
                base.scheme()
            )));
        }
        let route_url = Url::parse(&format!("{}/route", settings.base_url.trim_end_matches('/')))
            .map_err(|e| AthisError::configuration(format!("invalid routing url: {e}")))?;

        if settings.timeout.is_zero() {
            return Err(AthisError::configuration("routing timeout must be positive"));
        }
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| AthisError::configuration(format!("http client: {e}")))?;

        tracing::debug!(url = %route_url, vehicle = %settings.vehicle, "graphhopper client ready");
        Ok(Self {
            client,
            route_url,
            api_key,
            vehicle: settings.vehicle,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    paths: Vec<RoutePath>,
}

#[derive(Debug, Deserialize)]
struct RoutePath {
    distance: f64,
    /// milliseconds
    time: f64,
    points: RoutePoints,
}

#[derive(Debug, Deserialize)]
struct RoutePoints {
    /// GeoJSON order: [lng, lat] or [lng, lat, elevation]
    coordinates: Vec<Vec<f64>>,
}

impl RoutePath {
    fn into_result(self) -> Result<RouteResult> {
        let geometry = self
            .points
            .coordinates
            .iter()
            .map(|pair| match pair.as_slice() {
                [lng, lat, ..] => {
                    let point = GeoPoint::new(*lat, *lng);
                    point.is_valid().then_some(point)
                }
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| AthisError::routing_unavailable("malformed path geometry"))?;

        if geometry.is_empty() {
            return Err(AthisError::routing_unavailable("empty path geometry"));
        }
        if !self.distance.is_finite() || !self.time.is_finite() {
            return Err(AthisError::routing_unavailable("non-numeric distance or time"));
        }
        Ok(RouteResult {
            geometry,
            distance_meters: self.distance,
            duration_seconds: self.time / 1000.0,
        })
    }
}

fn coordinate_param(point: GeoPoint) -> String {
    format!("{},{}", point.lat, point.lng)
}

#[async_trait]
impl RouteProvider for GraphHopperClient {
    async fn compute_route(&self, start: GeoPoint, end: GeoPoint) -> Result<RouteResult> {
        start
            .validate()
            .map_err(|e| AthisError::invalid_request(format!("start: {e}")))?;
        end.validate()
            .map_err(|e| AthisError::invalid_request(format!("end: {e}")))?;

        tracing::debug!(%start, %end, "requesting route");
        let query = [
            ("point", coordinate_param(start)),
            ("point", coordinate_param(end)),
            ("vehicle", self.vehicle.clone()),
            ("instructions", "false".to_string()),
            ("calc_points", "true".to_string()),
            ("points_encoded", "false".to_string()),
            ("key", self.api_key.clone()),
        ];
        let response = self
            .client
            .get(self.route_url.clone())
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AthisError::routing_unavailable("routing request timed out")
                } else {
                    AthisError::routing_unavailable(format!("routing request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "routing provider rejected request");
            return Err(AthisError::routing_unavailable(format!(
                "routing provider returned {status}"
            )));
        }

        let body: RouteResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AthisError::routing_unavailable("routing response timed out")
            } else {
                AthisError::routing_unavailable(format!("malformed routing response: {e}"))
            }
        })?;

        let path = body
            .paths
            .into_iter()
            .next()
            .ok_or_else(|| AthisError::routing_unavailable("routing response has no path"))?;
        let route = path.into_result()?;
        tracing::debug!(
            distance_m = route.distance_meters,
            duration_s = route.duration_seconds,
            points = route.geometry.len(),
            "route computed"
        );
        Ok(route)
    }
}
