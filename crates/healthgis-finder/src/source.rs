//! The seam between the engine and the facility API.

use std::future::Future;

use healthgis_api::normalize::{normalize_features, normalize_nearby};
use healthgis_api::{
    AmenityCount, ApiError, DistrictCount, FeatureCollection, HealthGisClient, NearbyResponse,
};
use healthgis_core::Facility;

use crate::plan::FetchPlan;

/// Raw response of a facility fetch, tagged by the endpoint that produced it.
///
/// Normalized by [`FacilityPayload::into_facilities`] as soon as it reaches
/// the engine.
#[derive(Debug, Clone)]
pub enum FacilityPayload {
    Catalog(FeatureCollection),
    Proximity(NearbyResponse),
}

impl FacilityPayload {
    #[must_use]
    pub fn into_facilities(self) -> Vec<Facility> {
        match self {
            FacilityPayload::Catalog(collection) => normalize_features(collection),
            FacilityPayload::Proximity(response) => normalize_nearby(response),
        }
    }
}

/// Where the engine gets facilities and facet values from.
pub trait FacilitySource {
    fn fetch_facilities(
        &self,
        plan: &FetchPlan,
    ) -> impl Future<Output = Result<FacilityPayload, ApiError>> + Send;

    fn fetch_districts(&self) -> impl Future<Output = Result<Vec<DistrictCount>, ApiError>> + Send;

    fn fetch_amenities(&self) -> impl Future<Output = Result<Vec<AmenityCount>, ApiError>> + Send;
}

impl FacilitySource for HealthGisClient {
    async fn fetch_facilities(&self, plan: &FetchPlan) -> Result<FacilityPayload, ApiError> {
        match plan {
            FetchPlan::Catalog(query) => self
                .get_facilities_geojson(query)
                .await
                .map(FacilityPayload::Catalog),
            FetchPlan::Proximity(query) => self
                .get_nearby_facilities(query)
                .await
                .map(FacilityPayload::Proximity),
        }
    }

    async fn fetch_districts(&self) -> Result<Vec<DistrictCount>, ApiError> {
        self.get_districts().await
    }

    async fn fetch_amenities(&self) -> Result<Vec<AmenityCount>, ApiError> {
        self.get_amenity_types().await
    }
}
