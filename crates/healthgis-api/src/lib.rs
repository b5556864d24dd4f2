//! Client for the HealthGIS facility API.
//!
//! The API serves the same facilities in two shapes: GeoJSON features from the
//! faceted catalog endpoint and flat records from the proximity endpoint.
//! [`normalize`] turns both into [`healthgis_core::Facility`].

pub mod client;
pub mod error;
mod metadata;
pub mod normalize;
pub mod query;
pub(crate) mod retry;
pub mod types;

pub use client::HealthGisClient;
pub use error::ApiError;
pub use query::{FacetQuery, NearbyQuery};
pub use types::{AmenityCount, DistrictCount, FeatureCollection, NearbyResponse, RawFacility};
