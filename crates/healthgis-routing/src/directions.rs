//! Directions from the user's position to a selected facility.

use healthgis_core::{Facility, UserLocation};

use crate::client::OsrmClient;
use crate::error::DirectionsError;
use crate::route::Route;

/// Computes a route from `origin` to `destination` with a single request.
///
/// # Errors
///
/// - [`DirectionsError::MissingLocation`] without any network call when the
///   origin is absent or invalid, or the destination is absent or lacks
///   coordinates.
/// - [`DirectionsError::RouteUnavailable`] when the service finds no route.
/// - [`DirectionsError::Http`] / [`DirectionsError::Deserialize`] on
///   transport or decoding failure.
pub async fn plan_route(
    client: &OsrmClient,
    origin: Option<UserLocation>,
    destination: Option<&Facility>,
) -> Result<Route, DirectionsError> {
    let origin = origin
        .filter(UserLocation::is_valid)
        .ok_or(DirectionsError::MissingLocation)?;
    let facility = destination.ok_or(DirectionsError::MissingLocation)?;
    let target = facility
        .coordinates()
        .filter(UserLocation::is_valid)
        .ok_or(DirectionsError::MissingLocation)?;

    let response = client.fetch_route(origin, target).await?;
    // `fetch_route` guarantees at least one route.
    let Some(best) = response.routes.first() else {
        return Err(DirectionsError::RouteUnavailable {
            code: response.code,
        });
    };
    let route = Route::from_osrm(best);

    tracing::info!(
        facility = %facility.name,
        distance_km = route.distance_km,
        duration_min = route.duration_min,
        steps = route.steps.len(),
        "route calculated"
    );
    Ok(route)
}

/// Holds the route for the directions view.
///
/// Each [`DirectionsWorkflow::request`] discards the previous route before
/// asking for a new one, so a failed request never leaves a stale route
/// visible.
pub struct DirectionsWorkflow {
    client: OsrmClient,
    current: Option<Route>,
}

impl DirectionsWorkflow {
    #[must_use]
    pub fn new(client: OsrmClient) -> Self {
        Self {
            client,
            current: None,
        }
    }

    /// Replaces the current route with one to `destination`.
    ///
    /// Not retried on failure; call again to retry.
    ///
    /// # Errors
    ///
    /// Same as [`plan_route`].
    pub async fn request(
        &mut self,
        origin: Option<UserLocation>,
        destination: Option<&Facility>,
    ) -> Result<&Route, DirectionsError> {
        self.current = None;
        match plan_route(&self.client, origin, destination).await {
            Ok(route) => Ok(self.current.insert(route)),
            Err(err) => {
                tracing::warn!(error = %err, "directions request failed");
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Route> {
        self.current.as_ref()
    }

    /// Drops the current route, e.g. when the directions view is left.
    pub fn clear(&mut self) {
        self.current = None;
    }
}
