//! Request parameters for the facility endpoints.

use healthgis_core::UserLocation;

/// Categorical filters understood by both the catalog and proximity endpoints.
///
/// Empty strings are treated the same as `None`. The two service flags are
/// sent as `"yes"` when set and omitted otherwise; the API never receives
/// `"no"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetQuery {
    pub district: Option<String>,
    pub region: Option<String>,
    pub amenity: Option<String>,
    pub emergency: bool,
    pub wheelchair: bool,
}

impl FacetQuery {
    /// Wire value for the `emergency` flag: `"yes"` or `""`.
    #[must_use]
    pub fn emergency_param(&self) -> &'static str {
        flag_param(self.emergency)
    }

    /// Wire value for the `wheelchair` flag: `"yes"` or `""`.
    #[must_use]
    pub fn wheelchair_param(&self) -> &'static str {
        flag_param(self.wheelchair)
    }

    /// Query pairs to append to a request, skipping empty values.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        for (key, value) in [
            ("district", self.district.as_deref()),
            ("region", self.region.as_deref()),
            ("amenity", self.amenity.as_deref()),
            ("emergency", Some(self.emergency_param())),
            ("wheelchair", Some(self.wheelchair_param())),
        ] {
            if let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((key, v.to_string()));
            }
        }
        pairs
    }
}

fn flag_param(set: bool) -> &'static str {
    if set {
        "yes"
    } else {
        ""
    }
}

/// Parameters for the proximity endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub origin: UserLocation,
    pub radius_km: f64,
    pub facets: FacetQuery,
}

impl NearbyQuery {
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("lat", self.origin.lat.to_string()),
            ("lng", self.origin.lng.to_string()),
            ("radius", self.radius_km.to_string()),
        ];
        pairs.extend(self.facets.query_pairs());
        pairs
    }
}
