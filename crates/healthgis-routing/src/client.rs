//! HTTP client for an OSRM-compatible `route` service.

use std::time::Duration;

use healthgis_core::{AppConfig, UserLocation};
use reqwest::{Client, Url};

use crate::error::DirectionsError;
use crate::types::OsrmResponse;

const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";
const DEFAULT_USER_AGENT: &str = "healthgis/0.1 (facility-finder)";

/// Client for the OSRM driving profile.
///
/// Never retries: each call is one request.
pub struct OsrmClient {
    client: Client,
    base_url: Url,
}

impl OsrmClient {
    /// Creates a client pointed at the public OSRM demo server.
    ///
    /// # Errors
    ///
    /// Returns [`DirectionsError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64) -> Result<Self, DirectionsError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout_secs, DEFAULT_USER_AGENT)
    }

    /// # Errors
    ///
    /// Returns [`DirectionsError::InvalidBaseUrl`] or [`DirectionsError::Http`].
    pub fn from_config(config: &AppConfig) -> Result<Self, DirectionsError> {
        Self::with_base_url(
            &config.routing_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`DirectionsError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`DirectionsError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, DirectionsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| DirectionsError::InvalidBaseUrl {
            base_url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Requests a driving route with full GeoJSON geometry and step instructions.
    ///
    /// Returns the raw response only when `code` is `"Ok"` and at least one
    /// route is present.
    ///
    /// # Errors
    ///
    /// - [`DirectionsError::RouteUnavailable`] on a non-2xx status, a non-`Ok`
    ///   code, or an empty route list.
    /// - [`DirectionsError::Http`] on network failure or timeout.
    /// - [`DirectionsError::Deserialize`] if a 2xx body has an unexpected shape.
    pub async fn fetch_route(
        &self,
        from: UserLocation,
        to: UserLocation,
    ) -> Result<OsrmResponse, DirectionsError> {
        let url = self.route_url(from, to)?;
        tracing::debug!(url = %url, "requesting driving route");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // OSRM reports routing failures such as `NoRoute` as 4xx with a JSON code.
            let code = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("code").and_then(serde_json::Value::as_str).map(str::to_string))
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(DirectionsError::RouteUnavailable { code });
        }

        let parsed: OsrmResponse =
            serde_json::from_str(&body).map_err(|e| DirectionsError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        if parsed.code != crate::types::CODE_OK || parsed.routes.is_empty() {
            tracing::warn!(
                code = %parsed.code,
                message = parsed.message.as_deref().unwrap_or_default(),
                routes = parsed.routes.len(),
                "routing service returned no usable route"
            );
            return Err(DirectionsError::RouteUnavailable { code: parsed.code });
        }

        Ok(parsed)
    }

    /// `route/v1/driving/{lng},{lat};{lng},{lat}` with geometry and step options.
    fn route_url(&self, from: UserLocation, to: UserLocation) -> Result<Url, DirectionsError> {
        let path = format!(
            "route/v1/driving/{},{};{},{}",
            from.lng, from.lat, to.lng, to.lat
        );
        let mut url = self
            .base_url
            .join(&path)
            .map_err(|e| DirectionsError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: format!("cannot join '{path}': {e}"),
            })?;
        url.query_pairs_mut()
            .append_pair("overview", "full")
            .append_pair("geometries", "geojson")
            .append_pair("steps", "true");
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_url_orders_coordinates_lng_lat() {
        let client = OsrmClient::with_base_url("https://osrm.example.org/", 5, "ua").unwrap();
        let url = client
            .route_url(UserLocation::new(-13.96, 33.77), UserLocation::new(-13.98, 33.78))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://osrm.example.org/route/v1/driving/33.77,-13.96;33.78,-13.98?overview=full&geometries=geojson&steps=true"
        );
    }
}
