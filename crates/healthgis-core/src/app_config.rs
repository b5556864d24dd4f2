use crate::location::UserLocation;

/// Runtime configuration for the finder clients and shell.
///
/// Built by [`crate::load_app_config`]; every field has a default so an empty
/// environment yields a working configuration against the public services.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the facility API, e.g. `https://healthgis-api.onrender.com/api`.
    pub api_base_url: String,
    /// Base URL of the OSRM-compatible routing service.
    pub routing_base_url: String,
    pub request_timeout_secs: u64,
    /// Upper bound on how long the platform position query may take before
    /// the fallback coordinate is used.
    pub geolocation_timeout_secs: u64,
    pub user_agent: String,
    pub api_max_retries: u32,
    pub api_retry_backoff_base_ms: u64,
    /// Coordinate used when the platform position is denied or unavailable.
    pub fallback_location: UserLocation,
    pub default_radius_km: f64,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://healthgis-api.onrender.com/api".to_string(),
            routing_base_url: "https://router.project-osrm.org".to_string(),
            request_timeout_secs: 15,
            geolocation_timeout_secs: 10,
            user_agent: "healthgis/0.1 (facility-finder)".to_string(),
            api_max_retries: 2,
            api_retry_backoff_base_ms: 500,
            fallback_location: UserLocation::LILONGWE,
            default_radius_km: crate::DEFAULT_RADIUS_KM,
            log_level: "info".to_string(),
        }
    }
}
