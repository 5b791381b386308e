//! Route computed by the routing provider.

use serde::{Deserialize, Serialize};

use super::geo::GeoPoint;

/// Always fully populated; partial results are reported as errors instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub geometry: Vec<GeoPoint>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}
