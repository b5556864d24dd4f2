//! Driving directions from a user's position to a facility.
//!
//! [`OsrmClient`] talks to an OSRM-compatible routing service;
//! [`DirectionsWorkflow`] checks preconditions, issues exactly one request per
//! invocation, and derives a [`Route`] for display.

pub mod client;
pub mod directions;
pub mod error;
pub mod maneuver;
pub mod route;
pub mod types;

pub use client::OsrmClient;
pub use directions::{plan_route, DirectionsWorkflow};
pub use error::DirectionsError;
pub use maneuver::maneuver_instruction;
pub use route::{Route, RouteBounds, RouteStep};
