//! Wire types for HealthGIS API responses.
//!
//! Numeric fields arrive as JSON numbers from some deployments and as decimal
//! strings from others, so scalar fields go through the lenient helpers in
//! [`lenient`].

use healthgis_core::FacilityId;
use serde::{Deserialize, Serialize};

/// Body of `GET /facilities/geojson/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<FacilityFeature>,
}

/// One GeoJSON feature. `properties` is required so that flat records never
/// deserialize as features inside [`RawFacility`].
#[derive(Debug, Clone, Deserialize)]
pub struct FacilityFeature {
    #[serde(default)]
    pub id: Option<FacilityId>,
    pub properties: FeatureProperties,
    #[serde(default)]
    pub geometry: Option<PointGeometry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureProperties {
    /// Some serializers put the primary key here instead of on the feature.
    #[serde(default)]
    pub id: Option<FacilityId>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub district: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub amenity: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub emergency: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub wheelchair: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub operator: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub beds: Option<u32>,
}

/// GeoJSON point geometry; `coordinates` is `[lon, lat]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PointGeometry {
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

/// Body of `GET /facilities/nearby/`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NearbyResponse {
    #[serde(default)]
    pub facilities: Vec<FlatFacility>,
}

/// Flat facility record as served by the proximity and detail endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct FlatFacility {
    /// Absent on some records; normalization assigns a positional id.
    #[serde(default)]
    pub id: Option<FacilityId>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub district: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub amenity: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub emergency: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub wheelchair: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub operator: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub beds: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub longitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub distance_km: Option<f64>,
}

/// A single facility in either response shape (detail endpoint).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawFacility {
    Feature(FacilityFeature),
    Flat(FlatFacility),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictCount {
    pub district: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmenityCount {
    pub amenity: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DistrictsResponse {
    #[serde(default)]
    pub districts: Vec<DistrictCount>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AmenitiesResponse {
    #[serde(default)]
    pub amenities: Vec<AmenityCount>,
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub(super) fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) => Some(s),
            Some(Value::Bool(b)) => Some(if b { "yes" } else { "no" }.to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    pub(super) fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .filter(|v| v.is_finite()))
    }

    pub(super) fn opt_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
            _ => None,
        })
    }
}
