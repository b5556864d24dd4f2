//! Facility query/filter engine and geolocation resolution.
//!
//! [`FacilityEngine`] owns the filter state, decides whether a change needs a
//! remote fetch (categorical filters, radius, location) or only a local
//! re-filter (free-text search), and keeps the last fetched collection when a
//! fetch fails. [`GeolocationResolver`] produces the user's position once per
//! session with a fallback coordinate.

pub mod engine;
pub mod error;
pub mod filters;
pub mod geolocation;
pub mod plan;
pub mod search;
pub mod source;

pub use engine::{EngineSnapshot, FacilityEngine, FetchOutcome};
pub use error::{FilterError, GeolocationError};
pub use filters::{FilterState, FilterUpdate, FlagFilter};
pub use geolocation::{
    GeolocationResolver, LocationSource, ManualPosition, PositionProvider, ResolutionState,
    ResolvedLocation, UnavailablePosition,
};
pub use plan::FetchPlan;
pub use search::filter_by_query;
pub use source::{FacilityPayload, FacilitySource};
