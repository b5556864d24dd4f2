//! Which request a given filter state maps to.

use healthgis_api::{FacetQuery, NearbyQuery};
use healthgis_core::{UserLocation, DEFAULT_RADIUS_KM};

use crate::filters::{is_valid_radius, FilterState};

/// The remote request implied by the fetch-relevant part of the filters.
///
/// Two states with equal plans need no re-fetch between them; this is how
/// search-query edits, and radius edits outside proximity mode, avoid the
/// network.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchPlan {
    /// All facilities matching the categorical filters.
    Catalog(FacetQuery),
    /// Facilities within a radius of the user.
    Proximity(NearbyQuery),
}

impl FetchPlan {
    /// Proximity mode needs both the `use_distance` gate and a location;
    /// otherwise the plan falls back to catalog mode.
    #[must_use]
    pub fn for_state(filters: &FilterState, location: Option<UserLocation>) -> Self {
        let facets = FacetQuery {
            district: non_empty(&filters.district),
            region: non_empty(&filters.region),
            amenity: non_empty(&filters.amenity),
            emergency: filters.emergency.is_required(),
            wheelchair: filters.wheelchair.is_required(),
        };

        match location {
            Some(origin) if filters.use_distance => FetchPlan::Proximity(NearbyQuery {
                origin,
                // A non-finite radius would make equal plans compare unequal.
                radius_km: if is_valid_radius(filters.distance_km) {
                    filters.distance_km
                } else {
                    DEFAULT_RADIUS_KM
                },
                facets,
            }),
            _ => FetchPlan::Catalog(facets),
        }
    }

    #[must_use]
    pub fn facets(&self) -> &FacetQuery {
        match self {
            FetchPlan::Catalog(facets) => facets,
            FetchPlan::Proximity(query) => &query.facets,
        }
    }

    #[must_use]
    pub fn mode(&self) -> &'static str {
        match self {
            FetchPlan::Catalog(_) => "catalog",
            FetchPlan::Proximity(_) => "proximity",
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
