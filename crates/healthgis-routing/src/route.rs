//! Display-ready route derived from an OSRM response.

use serde::Serialize;

use crate::maneuver::maneuver_instruction;
use crate::types::OsrmRoute;

/// A driving route from the user to a facility.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Polyline as `[lat, lng]` pairs, in travel order.
    pub points: Vec<[f64; 2]>,
    /// Total distance in kilometres, rounded to two decimals.
    pub distance_km: f64,
    /// Total travel time in whole minutes.
    pub duration_min: u64,
    pub steps: Vec<RouteStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStep {
    pub instruction: String,
    pub distance_km: f64,
    pub duration_min: u64,
}

/// Bounding box of a route polyline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Route {
    /// Builds a route from the first OSRM route of a response.
    ///
    /// Geometry is flipped from `[lon, lat]` to `[lat, lng]`; steps from
    /// every leg are concatenated in order.
    #[must_use]
    pub fn from_osrm(route: &OsrmRoute) -> Self {
        let points = route
            .geometry
            .coordinates
            .iter()
            .map(|[lon, lat]| [*lat, *lon])
            .collect();

        let steps = route
            .legs
            .iter()
            .flat_map(|leg| leg.steps.iter())
            .map(|step| RouteStep {
                instruction: maneuver_instruction(&step.maneuver),
                distance_km: metres_to_km(step.distance),
                duration_min: seconds_to_minutes(step.duration),
            })
            .collect();

        Self {
            points,
            distance_km: metres_to_km(route.distance),
            duration_min: seconds_to_minutes(route.duration),
            steps,
        }
    }

    /// Smallest box containing every point, or `None` for an empty polyline.
    #[must_use]
    pub fn bounds(&self) -> Option<RouteBounds> {
        let (first, rest) = self.points.split_first()?;
        let init = RouteBounds {
            south: first[0],
            west: first[1],
            north: first[0],
            east: first[1],
        };
        Some(rest.iter().fold(init, |b, [lat, lng]| RouteBounds {
            south: b.south.min(*lat),
            west: b.west.min(*lng),
            north: b.north.max(*lat),
            east: b.east.max(*lng),
        }))
    }
}

/// Metres to kilometres, rounded to two decimals.
///
/// Dividing by ten first keeps whole-metre inputs exact, so 12 345 m is
/// 1 234.5 before rounding and lands on 12.35 km.
fn metres_to_km(metres: f64) -> f64 {
    (metres / 10.0).round() / 100.0
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn seconds_to_minutes(seconds: f64) -> u64 {
    (seconds.max(0.0) / 60.0).round() as u64
}
