//! The canonical facility record every response shape is normalized into.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::location::UserLocation;

/// Display name used when the data source omits one.
pub const UNKNOWN_FACILITY_NAME: &str = "Unknown Facility";

/// Opaque facility identifier.
///
/// The catalog and proximity endpoints may use different identifiers for the
/// same facility, so an id is only meaningful inside the result set that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacilityId {
    Int(i64),
    Text(String),
}

impl fmt::Display for FacilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacilityId::Int(id) => write!(f, "{id}"),
            FacilityId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for FacilityId {
    fn from(id: i64) -> Self {
        FacilityId::Int(id)
    }
}

impl From<&str> for FacilityId {
    fn from(id: &str) -> Self {
        // Numeric strings compare equal to the integer form the API returns.
        id.parse::<i64>()
            .map_or_else(|_| FacilityId::Text(id.to_string()), FacilityId::Int)
    }
}

/// Display interpretation of the `"yes"`-or-absent service flags.
///
/// Absence is [`Availability::Unknown`], never [`Availability::No`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Yes,
    No,
    Unknown,
}

impl Availability {
    fn from_flag(flag: Option<&str>) -> Self {
        match flag.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("yes") => Availability::Yes,
            Some(v) if v.eq_ignore_ascii_case("no") => Availability::No,
            _ => Availability::Unknown,
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Availability::Yes => "Yes",
            Availability::No => "No",
            Availability::Unknown => "Unknown",
        })
    }
}

/// A health facility after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub id: FacilityId,
    pub name: String,
    pub address: Option<String>,
    pub district: Option<String>,
    pub region: Option<String>,
    /// Facility type, e.g. `hospital`, `clinic`, `pharmacy`.
    pub amenity: Option<String>,
    /// Raw flag as served; only `"yes"` is meaningful to filters.
    pub emergency: Option<String>,
    pub wheelchair: Option<String>,
    pub operator: Option<String>,
    pub beds: Option<u32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Only populated for records that came from a proximity query.
    pub distance_km: Option<f64>,
}

impl Facility {
    /// Returns `(lat, lng)` when both coordinates are present and finite.
    ///
    /// Facilities without coordinates stay in list views but must not be
    /// placed on a map.
    #[must_use]
    pub fn coordinates(&self) -> Option<UserLocation> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(UserLocation::new(lat, lng))
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn emergency(&self) -> Availability {
        Availability::from_flag(self.emergency.as_deref())
    }

    #[must_use]
    pub fn wheelchair(&self) -> Availability {
        Availability::from_flag(self.wheelchair.as_deref())
    }

    /// `"district, region"` built from whichever parts are present.
    #[must_use]
    pub fn synthesized_address(district: Option<&str>, region: Option<&str>) -> Option<String> {
        let parts: Vec<&str> = [district, region]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facility() -> Facility {
        Facility {
            id: FacilityId::Int(1),
            name: "Kamuzu Central Hospital".to_string(),
            address: None,
            district: Some("Lilongwe".to_string()),
            region: Some("Central".to_string()),
            amenity: Some("hospital".to_string()),
            emergency: None,
            wheelchair: Some("no".to_string()),
            operator: None,
            beds: Some(800),
            latitude: Some(-13.98),
            longitude: Some(33.78),
            distance_km: None,
        }
    }

    #[test]
    fn absent_flag_is_unknown_not_no() {
        let f = facility();
        assert_eq!(f.emergency(), Availability::Unknown);
        assert_eq!(f.wheelchair(), Availability::No);
    }

    #[test]
    fn coordinates_require_both_components() {
        let mut f = facility();
        assert!(f.coordinates().is_some());
        f.longitude = None;
        assert!(f.coordinates().is_none());
    }

    #[test]
    fn synthesized_address_skips_missing_parts() {
        assert_eq!(
            Facility::synthesized_address(Some("Lilongwe"), Some("Central")).as_deref(),
            Some("Lilongwe, Central")
        );
        assert_eq!(
            Facility::synthesized_address(None, Some("Central")).as_deref(),
            Some("Central")
        );
        assert_eq!(Facility::synthesized_address(None, Some("  ")), None);
    }

    #[test]
    fn numeric_string_id_matches_integer_id() {
        assert_eq!(FacilityId::from("42"), FacilityId::Int(42));
        assert_eq!(FacilityId::from("n-42"), FacilityId::Text("n-42".to_string()));
    }

    #[test]
    fn id_deserializes_from_number_or_string() {
        let int: FacilityId = serde_json::from_str("7").unwrap();
        let text: FacilityId = serde_json::from_str("\"node/7\"").unwrap();
        assert_eq!(int, FacilityId::Int(7));
        assert_eq!(text, FacilityId::Text("node/7".to_string()));
    }
}
