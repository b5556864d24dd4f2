use crate::app_config::AppConfig;
use crate::location::UserLocation;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is set to an invalid value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Every variable is optional; unset variables take the [`AppConfig::default`]
/// value.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = AppConfig::default();

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: u32| -> Result<u32, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw.trim().parse::<u32>().map_err(|e| invalid(var, e.to_string())),
            Err(_) => Ok(default),
        }
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| invalid(var, e.to_string())),
            Err(_) => Ok(default),
        }
    };

    let parse_f64 = |var: &str, default: f64| -> Result<f64, ConfigError> {
        match lookup(var) {
            Ok(raw) => {
                let value = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|e| invalid(var, e.to_string()))?;
                if value.is_finite() {
                    Ok(value)
                } else {
                    Err(invalid(var, format!("{raw} is not a finite number")))
                }
            }
            Err(_) => Ok(default),
        }
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let api_base_url = or_default("HEALTHGIS_API_URL", &defaults.api_base_url);
    let routing_base_url = or_default("HEALTHGIS_ROUTING_URL", &defaults.routing_base_url);
    let user_agent = or_default("HEALTHGIS_USER_AGENT", &defaults.user_agent);
    let log_level = or_default("HEALTHGIS_LOG_LEVEL", &defaults.log_level);

    let request_timeout_secs =
        parse_u64("HEALTHGIS_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs)?;
    let geolocation_timeout_secs = parse_u64(
        "HEALTHGIS_GEOLOCATION_TIMEOUT_SECS",
        defaults.geolocation_timeout_secs,
    )?;
    let api_max_retries = parse_u32("HEALTHGIS_API_MAX_RETRIES", defaults.api_max_retries)?;
    let api_retry_backoff_base_ms = parse_u64(
        "HEALTHGIS_API_RETRY_BACKOFF_BASE_MS",
        defaults.api_retry_backoff_base_ms,
    )?;

    let fallback_lat = parse_f64("HEALTHGIS_FALLBACK_LAT", defaults.fallback_location.lat)?;
    if !(-90.0..=90.0).contains(&fallback_lat) {
        return Err(invalid(
            "HEALTHGIS_FALLBACK_LAT",
            format!("{fallback_lat} is outside -90..=90"),
        ));
    }
    let fallback_lng = parse_f64("HEALTHGIS_FALLBACK_LNG", defaults.fallback_location.lng)?;
    if !(-180.0..=180.0).contains(&fallback_lng) {
        return Err(invalid(
            "HEALTHGIS_FALLBACK_LNG",
            format!("{fallback_lng} is outside -180..=180"),
        ));
    }

    let default_radius_km = parse_f64("HEALTHGIS_DEFAULT_RADIUS_KM", defaults.default_radius_km)?;
    if default_radius_km <= 0.0 {
        return Err(invalid(
            "HEALTHGIS_DEFAULT_RADIUS_KM",
            format!("{default_radius_km} must be greater than zero"),
        ));
    }

    Ok(AppConfig {
        api_base_url,
        routing_base_url,
        request_timeout_secs,
        geolocation_timeout_secs,
        user_agent,
        api_max_retries,
        api_retry_backoff_base_ms,
        fallback_location: UserLocation::new(fallback_lat, fallback_lng),
        default_radius_km,
        log_level,
    })
}
