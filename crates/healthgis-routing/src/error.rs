use thiserror::Error;

/// Failures of the directions workflow.
#[derive(Debug, Error)]
pub enum DirectionsError {
    /// The user position or the destination coordinates are unknown.
    /// Raised before any network call is made.
    #[error("missing location information")]
    MissingLocation,

    /// The routing service answered but produced no usable route.
    #[error("no route found (code {code})")]
    RouteUnavailable { code: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{base_url}': {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}

impl DirectionsError {
    /// Message suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            DirectionsError::MissingLocation => "Missing location information",
            DirectionsError::RouteUnavailable { .. } => "No route found",
            DirectionsError::Http(_)
            | DirectionsError::Deserialize { .. }
            | DirectionsError::InvalidBaseUrl { .. } => {
                "Unable to calculate route. Please try again later."
            }
        }
    }
}
