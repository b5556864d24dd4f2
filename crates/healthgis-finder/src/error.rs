use thiserror::Error;

/// Errors from parsing a `key=value` filter update.
#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("unknown filter key: {0}")]
    UnknownKey(String),

    #[error("invalid value for filter {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Reasons the platform position could not be obtained.
///
/// None of these reach the user: the resolver substitutes the fallback
/// coordinate and logs the cause.
#[derive(Debug, Error, PartialEq)]
pub enum GeolocationError {
    #[error("location permission denied")]
    Denied,

    #[error("location capability unavailable")]
    Unavailable,

    #[error("position request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("reported position ({lat}, {lng}) is not a valid coordinate")]
    InvalidPosition { lat: f64, lng: f64 },
}
