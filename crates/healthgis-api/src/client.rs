//! HTTP client for the HealthGIS facility API.
//!
//! Wraps `reqwest` with a request timeout, retry on transient failures and
//! typed response deserialization. Facet listing, detail and statistics
//! endpoints live in `metadata.rs`.

use std::time::Duration;

use healthgis_core::AppConfig;
use reqwest::{Client, Url};

use crate::error::ApiError;
use crate::query::{FacetQuery, NearbyQuery};
use crate::retry::retry_with_backoff;
use crate::types::{FeatureCollection, NearbyResponse};

const DEFAULT_BASE_URL: &str = "https://healthgis-api.onrender.com/api";
const DEFAULT_USER_AGENT: &str = "healthgis/0.1 (facility-finder)";

/// Client for the HealthGIS REST API.
///
/// Use [`HealthGisClient::from_config`] in the application and
/// [`HealthGisClient::with_base_url`] to point at a mock server in tests.
/// Clients built with `with_base_url` do not retry until
/// [`HealthGisClient::with_retry_policy`] is applied.
pub struct HealthGisClient {
    client: Client,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl HealthGisClient {
    /// Creates a client pointed at the public HealthGIS deployment.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed.
    pub fn new(timeout_secs: u64) -> Result<Self, ApiError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs, DEFAULT_USER_AGENT)
    }

    /// Creates a client from application configuration, including its retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] if `api_base_url` does not parse,
    /// or [`ApiError::Http`] if the HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        Ok(Self::with_base_url(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_retry_policy(config.api_max_retries, config.api_retry_backoff_base_ms))
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`ApiError::InvalidBaseUrl`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so that `Url::join` appends below the
        // API prefix instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Enables retry of transient failures.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Fetches all facilities matching `query` as a GeoJSON collection.
    ///
    /// Some deployments wrap the collection in a second `features` object;
    /// the inner collection is returned in that case.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure or timeout.
    /// - [`ApiError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ApiError::Deserialize`] if the body is not a feature collection.
    pub async fn get_facilities_geojson(
        &self,
        query: &FacetQuery,
    ) -> Result<FeatureCollection, ApiError> {
        let url = self.build_url("facilities/geojson/", &query.query_pairs())?;
        tracing::debug!(url = %url, "fetching facility catalog");
        let mut body = self.request_json(&url).await?;

        let nested = body
            .get("features")
            .and_then(|f| f.get("type"))
            .and_then(serde_json::Value::as_str)
            == Some("FeatureCollection");
        if nested {
            body = body["features"].take();
        }

        serde_json::from_value(body).map_err(|e| ApiError::Deserialize {
            context: "facilities/geojson".to_string(),
            source: e,
        })
    }

    /// Fetches facilities within `query.radius_km` of `query.origin`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure or timeout.
    /// - [`ApiError::UnexpectedStatus`] on a non-2xx status.
    /// - [`ApiError::Deserialize`] if the body does not match the expected shape.
    pub async fn get_nearby_facilities(
        &self,
        query: &NearbyQuery,
    ) -> Result<NearbyResponse, ApiError> {
        let url = self.build_url("facilities/nearby/", &query.query_pairs())?;
        tracing::debug!(
            url = %url,
            radius_km = query.radius_km,
            "fetching nearby facilities"
        );
        let body = self.request_json(&url).await?;
        serde_json::from_value(body).map_err(|e| ApiError::Deserialize {
            context: format!(
                "facilities/nearby(lat={}, lng={}, radius={})",
                query.origin.lat, query.origin.lng, query.radius_km
            ),
            source: e,
        })
    }

    /// Builds an endpoint URL below the base URL with percent-encoded query pairs.
    pub(crate) fn build_url(
        &self,
        path: &str,
        pairs: &[(&str, String)],
    ) -> Result<Url, ApiError> {
        let mut url = self.base_url.join(path).map_err(|e| ApiError::InvalidBaseUrl {
            base_url: self.base_url.to_string(),
            reason: format!("cannot join '{path}': {e}"),
        })?;
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (k, v) in pairs {
                query.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET request (with retry), asserts a 2xx status and parses the
    /// body as JSON.
    pub(crate) async fn request_json(&self, url: &Url) -> Result<serde_json::Value, ApiError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            let response = self.client.get(url.clone()).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ApiError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }
            let body = response.text().await?;
            serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
                context: url.to_string(),
                source: e,
            })
        })
        .await
    }
}
