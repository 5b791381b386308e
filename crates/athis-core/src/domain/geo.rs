//! Geographic coordinates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A WGS84 point. Valid when `-90 <= lat <= 90` and `-180 <= lng <= 180`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Raised when a point leaves the valid latitude/longitude range.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("coordinates ({lat}, {lng}) outside [-90,90]x[-180,180]")]
pub struct OutOfRange {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// NaN never passes.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn validate(&self) -> Result<(), OutOfRange> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(OutOfRange {
                lat: self.lat,
                lng: self.lng,
            })
        }
    }

    /// Link used by staff to open the location in a web map.
    pub fn map_url(&self) -> String {
        format!("https://www.google.com/maps?q={},{}", self.lat, self.lng)
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

impl std::str::FromStr for GeoPoint {
    type Err = String;

    /// Parses `"lat,lng"`. Range is not checked here.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected 'lat,lng', got '{s}'"))?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("bad latitude '{lat}': {e}"))?;
        let lng = lng
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("bad longitude '{lng}': {e}"))?;
        Ok(Self { lat, lng })
    }
}
