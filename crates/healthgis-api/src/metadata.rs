//! Facet listing, detail and statistics endpoints for the HealthGIS client.

use healthgis_core::{Facility, FacilityId, UserLocation};

use crate::client::HealthGisClient;
use crate::error::ApiError;
use crate::normalize::normalize_raw;
use crate::types::{AmenitiesResponse, AmenityCount, DistrictCount, DistrictsResponse, RawFacility};

impl HealthGisClient {
    /// Lists every district with its facility count. Independent of filters.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ApiError::Deserialize`] if the response shape is unexpected.
    pub async fn get_districts(&self) -> Result<Vec<DistrictCount>, ApiError> {
        let url = self.build_url("facilities/districts/", &[])?;
        let body = self.request_json(&url).await?;
        let response: DistrictsResponse =
            serde_json::from_value(body).map_err(|e| ApiError::Deserialize {
                context: "facilities/districts".to_string(),
                source: e,
            })?;
        Ok(response.districts)
    }

    /// Lists every amenity type with its facility count. Independent of filters.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ApiError::Deserialize`] if the response shape is unexpected.
    pub async fn get_amenity_types(&self) -> Result<Vec<AmenityCount>, ApiError> {
        let url = self.build_url("facilities/amenities/", &[])?;
        let body = self.request_json(&url).await?;
        let response: AmenitiesResponse =
            serde_json::from_value(body).map_err(|e| ApiError::Deserialize {
                context: "facilities/amenities".to_string(),
                source: e,
            })?;
        Ok(response.amenities)
    }

    /// Fetches one facility by id. With an `origin`, the API also reports
    /// `distance_km` from that point.
    ///
    /// # Errors
    ///
    /// - [`ApiError::UnexpectedStatus`] with status 404 for an unknown id.
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::Deserialize`] if the body is neither a feature nor a flat record.
    pub async fn get_facility(
        &self,
        id: &FacilityId,
        origin: Option<UserLocation>,
    ) -> Result<Facility, ApiError> {
        let pairs = origin
            .map(|o| vec![("lat", o.lat.to_string()), ("lon", o.lng.to_string())])
            .unwrap_or_default();
        let mut url = self.build_url("facilities/", &pairs)?;
        let base_url = url.to_string();
        // Text ids may contain '/', so the id goes in as an encoded segment.
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl {
                base_url,
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .push(&id.to_string())
            .push("");
        let body = self.request_json(&url).await?;
        let raw: RawFacility = serde_json::from_value(body).map_err(|e| ApiError::Deserialize {
            context: format!("facilities/{id}"),
            source: e,
        })?;
        Ok(normalize_raw(raw))
    }

    /// Fetches aggregate statistics. The payload is passed through untouched.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ApiError::Deserialize`] if the body is not JSON.
    pub async fn get_statistics(&self) -> Result<serde_json::Value, ApiError> {
        let url = self.build_url("facilities/stats/", &[])?;
        self.request_json(&url).await
    }
}
