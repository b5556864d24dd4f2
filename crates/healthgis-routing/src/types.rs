//! Wire types for the OSRM `route` service.

use serde::Deserialize;

/// `code` value of a successful response.
pub const CODE_OK: &str = "Ok";

#[derive(Debug, Clone, Deserialize)]
pub struct OsrmResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsrmRoute {
    /// Metres.
    #[serde(alias = "distance_meters")]
    pub distance: f64,
    /// Seconds.
    #[serde(alias = "duration_seconds")]
    pub duration: f64,
    pub geometry: LineGeometry,
    #[serde(default)]
    pub legs: Vec<OsrmLeg>,
}

/// GeoJSON line; each position is `[lon, lat]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineGeometry {
    #[serde(default)]
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsrmLeg {
    #[serde(default)]
    pub steps: Vec<OsrmStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsrmStep {
    pub maneuver: Maneuver,
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Maneuver {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub modifier: Option<String>,
    #[serde(default)]
    pub instruction: Option<String>,
}
