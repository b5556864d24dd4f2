//! The facility query/filter engine.
//!
//! All state sits behind one mutex that is never held across a network call.
//! Every fetch takes a sequence number when issued; a response is applied
//! only if no later fetch has been issued since, so the last-issued fetch
//! always wins regardless of completion order.

use std::time::Duration;

use healthgis_api::{AmenityCount, DistrictCount};
use healthgis_core::{Facility, UserLocation};
use tokio::sync::Mutex;

use crate::filters::{FilterState, FilterUpdate};
use crate::plan::FetchPlan;
use crate::search::filter_by_query;
use crate::source::FacilitySource;

const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);
const FALLBACK_ERROR_MESSAGE: &str = "Failed to load facilities";

/// What happened to one issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced the fetched collection.
    Applied,
    /// The fetch failed; the previous collection was kept and `error` set.
    Failed,
    /// A later fetch was issued before this one settled; its result was dropped.
    Superseded,
}

/// Point-in-time copy of everything the presentation layer renders.
#[derive(Debug, Clone)]
pub struct EngineSnapshot {
    /// Fetched collection after local search filtering.
    pub visible: Vec<Facility>,
    /// Fetched collection as returned by the last applied fetch.
    pub facilities: Vec<Facility>,
    pub districts: Vec<DistrictCount>,
    pub amenities: Vec<AmenityCount>,
    pub filters: FilterState,
    pub user_location: Option<UserLocation>,
    pub loading: bool,
    pub error: Option<String>,
    /// Size of `facilities`, not of `visible`.
    pub total_count: usize,
}

impl EngineSnapshot {
    /// Visible facilities that can be placed on a map.
    pub fn mappable(&self) -> impl Iterator<Item = &Facility> {
        self.visible.iter().filter(|f| f.coordinates().is_some())
    }

    /// Looks a facility up by id within this snapshot's result set.
    #[must_use]
    pub fn find(&self, id: &healthgis_core::FacilityId) -> Option<&Facility> {
        self.facilities.iter().find(|f| &f.id == id)
    }
}

#[derive(Debug, Default)]
struct EngineState {
    filters: FilterState,
    location: Option<UserLocation>,
    facilities: Vec<Facility>,
    visible: Vec<Facility>,
    districts: Vec<DistrictCount>,
    amenities: Vec<AmenityCount>,
    loading: bool,
    error: Option<String>,
    /// Sequence number of the most recently issued fetch.
    latest_fetch: u64,
}

impl EngineState {
    fn plan(&self) -> FetchPlan {
        FetchPlan::for_state(&self.filters, self.location)
    }

    fn refresh_visible(&mut self) {
        self.visible = filter_by_query(&self.facilities, &self.filters.search_query);
    }
}

pub struct FacilityEngine<S> {
    source: S,
    fetch_timeout: Duration,
    state: Mutex<EngineState>,
}

impl<S: FacilitySource> FacilityEngine<S> {
    /// Creates an engine with default filters and nothing fetched yet.
    pub fn new(source: S) -> Self {
        Self {
            source,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            state: Mutex::new(EngineState::default()),
        }
    }

    /// Overrides how long a facility fetch may take before it counts as failed.
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Starts from `filters` instead of the defaults.
    #[must_use]
    pub fn with_filters(mut self, filters: FilterState) -> Self {
        let state = self.state.get_mut();
        state.filters = filters;
        state.refresh_visible();
        self
    }

    /// Starts with a known user location, as if it had already been resolved.
    #[must_use]
    pub fn with_user_location(mut self, location: UserLocation) -> Self {
        self.state.get_mut().location = Some(location);
        self
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Loads facet values and performs the initial fetch concurrently.
    pub async fn start(&self) -> FetchOutcome {
        let ((), outcome) = tokio::join!(self.load_facets(), self.fetch());
        outcome
    }

    /// Fetches district and amenity values, independent of filters.
    ///
    /// Failures are logged and leave the previous values in place.
    pub async fn load_facets(&self) {
        let (districts, amenities) =
            tokio::join!(self.source.fetch_districts(), self.source.fetch_amenities());

        let mut state = self.state.lock().await;
        match districts {
            Ok(values) => state.districts = values,
            Err(e) => tracing::warn!(error = %e, "failed to load district facets"),
        }
        match amenities {
            Ok(values) => state.amenities = values,
            Err(e) => tracing::warn!(error = %e, "failed to load amenity facets"),
        }
    }

    /// Sets one filter field.
    ///
    /// Re-fetches only when the change alters the request that would be sent;
    /// search-query changes re-filter the fetched collection in place.
    /// Returns the fetch outcome, or `None` if no fetch was needed.
    pub async fn update_filter(&self, update: FilterUpdate) -> Option<FetchOutcome> {
        let needs_fetch = {
            let mut state = self.state.lock().await;
            let before = state.plan();
            let local = update.is_local();
            state.filters.apply(update);
            if local {
                state.refresh_visible();
            }
            before != state.plan()
        };

        if needs_fetch {
            Some(self.fetch().await)
        } else {
            None
        }
    }

    /// Restores the default filters, re-fetching if the request changes.
    pub async fn clear_filters(&self) -> Option<FetchOutcome> {
        let needs_fetch = {
            let mut state = self.state.lock().await;
            let before = state.plan();
            state.filters = FilterState::default();
            state.refresh_visible();
            before != state.plan()
        };

        if needs_fetch {
            Some(self.fetch().await)
        } else {
            None
        }
    }

    /// Records the session's user location. Only the first call has an
    /// effect; later fixes are ignored.
    ///
    /// If proximity mode was waiting for a location, this triggers its fetch.
    pub async fn set_user_location(&self, location: UserLocation) -> Option<FetchOutcome> {
        let needs_fetch = {
            let mut state = self.state.lock().await;
            if state.location.is_some() {
                tracing::debug!("user location already set, ignoring new fix");
                return None;
            }
            let before = state.plan();
            state.location = Some(location);
            before != state.plan()
        };

        if needs_fetch {
            Some(self.fetch().await)
        } else {
            None
        }
    }

    /// Fetches with the current filters and the stored user location.
    pub async fn fetch(&self) -> FetchOutcome {
        self.run_fetch(None).await
    }

    /// Fetches with the current filters, using `origin` instead of the
    /// stored location for proximity mode. `origin` is not stored.
    pub async fn refetch_with_location(&self, origin: UserLocation) -> FetchOutcome {
        self.run_fetch(Some(origin)).await
    }

    async fn run_fetch(&self, origin: Option<UserLocation>) -> FetchOutcome {
        let (seq, plan) = {
            let mut state = self.state.lock().await;
            state.latest_fetch += 1;
            state.loading = true;
            state.error = None;
            let location = origin.or(state.location);
            (
                state.latest_fetch,
                FetchPlan::for_state(&state.filters, location),
            )
        };

        let facets = plan.facets();
        tracing::debug!(
            seq,
            mode = plan.mode(),
            district = facets.district.as_deref().unwrap_or_default(),
            region = facets.region.as_deref().unwrap_or_default(),
            amenity = facets.amenity.as_deref().unwrap_or_default(),
            emergency = facets.emergency_param(),
            wheelchair = facets.wheelchair_param(),
            "fetching facilities"
        );

        let result =
            match tokio::time::timeout(self.fetch_timeout, self.source.fetch_facilities(&plan))
                .await
            {
                Ok(Ok(payload)) => Ok(payload.into_facilities()),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err(format!(
                    "request timed out after {}s",
                    self.fetch_timeout.as_secs()
                )),
            };

        let mut state = self.state.lock().await;
        if seq != state.latest_fetch {
            tracing::debug!(
                seq,
                latest = state.latest_fetch,
                "discarding superseded fetch result"
            );
            return FetchOutcome::Superseded;
        }

        state.loading = false;
        match result {
            Ok(facilities) => {
                tracing::debug!(seq, count = facilities.len(), "facilities fetched");
                state.facilities = facilities;
                state.refresh_visible();
                FetchOutcome::Applied
            }
            Err(message) => {
                tracing::error!(seq, error = %message, "failed to fetch facilities");
                state.error = Some(if message.trim().is_empty() {
                    FALLBACK_ERROR_MESSAGE.to_string()
                } else {
                    message
                });
                FetchOutcome::Failed
            }
        }
    }

    pub async fn snapshot(&self) -> EngineSnapshot {
        let state = self.state.lock().await;
        EngineSnapshot {
            visible: state.visible.clone(),
            facilities: state.facilities.clone(),
            districts: state.districts.clone(),
            amenities: state.amenities.clone(),
            filters: state.filters.clone(),
            user_location: state.location,
            loading: state.loading,
            error: state.error.clone(),
            total_count: state.facilities.len(),
        }
    }

    /// The search-filtered list without copying the rest of the state.
    pub async fn visible(&self) -> Vec<Facility> {
        self.state.lock().await.visible.clone()
    }

    pub async fn filters(&self) -> FilterState {
        self.state.lock().await.filters.clone()
    }
}
