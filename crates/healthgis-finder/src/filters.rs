//! Filter state owned by the engine and the updates that mutate it.

use healthgis_core::DEFAULT_RADIUS_KM;

use crate::error::FilterError;

/// A `"yes"`-only service filter.
///
/// The API understands `emergency=yes` and nothing else, so the filter is
/// either required or not applied. It is never transmitted as `"no"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlagFilter {
    #[default]
    Any,
    Required,
}

impl FlagFilter {
    /// Coerces loosely-typed input.
    ///
    /// Empty, `no`, `false`, `0` and `off` (any case) leave the filter off;
    /// every other value turns it on.
    #[must_use]
    pub fn from_input(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "no" | "false" | "0" | "off" => FlagFilter::Any,
            _ => FlagFilter::Required,
        }
    }

    #[must_use]
    pub fn is_required(self) -> bool {
        self == FlagFilter::Required
    }

    /// Wire value: `"yes"` or `""`.
    #[must_use]
    pub fn as_param(self) -> &'static str {
        match self {
            FlagFilter::Any => "",
            FlagFilter::Required => "yes",
        }
    }
}

impl From<bool> for FlagFilter {
    fn from(required: bool) -> Self {
        if required {
            FlagFilter::Required
        } else {
            FlagFilter::Any
        }
    }
}

/// Every user-controlled filter.
///
/// `search_query` is applied locally; everything else shapes the remote
/// request. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub search_query: String,
    pub district: String,
    pub region: String,
    pub amenity: String,
    pub emergency: FlagFilter,
    pub wheelchair: FlagFilter,
    /// Radius for proximity mode, in kilometres.
    pub distance_km: f64,
    /// Gate for proximity mode; only effective once a user location exists.
    pub use_distance: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            district: String::new(),
            region: String::new(),
            amenity: String::new(),
            emergency: FlagFilter::Any,
            wheelchair: FlagFilter::Any,
            distance_km: DEFAULT_RADIUS_KM,
            use_distance: false,
        }
    }
}

impl FilterState {
    /// Sets the one field named by `update`, leaving the others as they are.
    ///
    /// A radius that is not a finite positive number is ignored, so the
    /// previous radius stays in effect.
    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::SearchQuery(v) => self.search_query = v,
            FilterUpdate::District(v) => self.district = v,
            FilterUpdate::Region(v) => self.region = v,
            FilterUpdate::Amenity(v) => self.amenity = v,
            FilterUpdate::Emergency(v) => self.emergency = v,
            FilterUpdate::Wheelchair(v) => self.wheelchair = v,
            FilterUpdate::Distance(v) if is_valid_radius(v) => self.distance_km = v,
            FilterUpdate::Distance(v) => {
                tracing::warn!(radius_km = v, "ignoring invalid search radius");
            }
            FilterUpdate::UseDistance(v) => self.use_distance = v,
        }
    }
}

/// A change to a single [`FilterState`] field.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterUpdate {
    SearchQuery(String),
    District(String),
    Region(String),
    Amenity(String),
    Emergency(FlagFilter),
    Wheelchair(FlagFilter),
    Distance(f64),
    UseDistance(bool),
}

impl FilterUpdate {
    /// Builds an update from a field name and a raw value.
    ///
    /// Keys accept both `snake_case` and the `camelCase` names the web client
    /// uses (`searchQuery`, `useDistance`).
    ///
    /// # Errors
    ///
    /// [`FilterError::UnknownKey`] for an unrecognised key, or
    /// [`FilterError::InvalidValue`] when `distance` is not a number or
    /// `use_distance` is not a boolean.
    pub fn from_key_value(key: &str, value: &str) -> Result<Self, FilterError> {
        let invalid = || FilterError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        Ok(match key {
            "search_query" | "searchQuery" | "q" => FilterUpdate::SearchQuery(value.to_string()),
            "district" => FilterUpdate::District(value.to_string()),
            "region" => FilterUpdate::Region(value.to_string()),
            "amenity" => FilterUpdate::Amenity(value.to_string()),
            "emergency" => FilterUpdate::Emergency(FlagFilter::from_input(value)),
            "wheelchair" => FilterUpdate::Wheelchair(FlagFilter::from_input(value)),
            "distance" | "radius" => {
                let radius = value.trim().parse::<f64>().map_err(|_| invalid())?;
                if !is_valid_radius(radius) {
                    return Err(invalid());
                }
                FilterUpdate::Distance(radius)
            }
            "use_distance" | "useDistance" => {
                FilterUpdate::UseDistance(value.trim().parse::<bool>().map_err(|_| invalid())?)
            }
            other => return Err(FilterError::UnknownKey(other.to_string())),
        })
    }

    /// Whether this field only affects the local view.
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(self, FilterUpdate::SearchQuery(_))
    }
}

pub(crate) fn is_valid_radius(km: f64) -> bool {
    km.is_finite() && km > 0.0
}
