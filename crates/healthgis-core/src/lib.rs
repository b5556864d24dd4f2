//! Shared domain types and configuration for the facility finder.

pub mod app_config;
pub mod config;
pub mod facility;
pub mod location;

use thiserror::Error;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use facility::{Availability, Facility, FacilityId, UNKNOWN_FACILITY_NAME};
pub use location::UserLocation;

/// Administrative regions the Facility Data Source partitions facilities into.
pub const REGION_OPTIONS: &[&str] = &["Central", "Northern", "Southern"];

/// Search radius in kilometres used when no other radius has been chosen.
pub const DEFAULT_RADIUS_KM: f64 = 50.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
