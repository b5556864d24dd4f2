//! One-shot user location with a deterministic fallback.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use healthgis_core::{AppConfig, UserLocation};
use tokio::sync::OnceCell;

use crate::error::GeolocationError;

/// The platform's current-position capability.
pub trait PositionProvider {
    fn current_position(
        &self,
    ) -> impl Future<Output = Result<UserLocation, GeolocationError>> + Send;
}

/// A position supplied up front, e.g. from command-line flags.
#[derive(Debug, Clone, Copy)]
pub struct ManualPosition(pub UserLocation);

impl PositionProvider for ManualPosition {
    async fn current_position(&self) -> Result<UserLocation, GeolocationError> {
        Ok(self.0)
    }
}

/// Stands in for a platform without a location capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailablePosition;

impl PositionProvider for UnavailablePosition {
    async fn current_position(&self) -> Result<UserLocation, GeolocationError> {
        Err(GeolocationError::Unavailable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    Device,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLocation {
    pub location: UserLocation,
    pub source: LocationSource,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResolutionState {
    /// Nothing requested yet.
    Pending,
    /// A position request is in flight.
    Resolving,
    Resolved(ResolvedLocation),
}

/// Resolves the user location at most once per resolver.
///
/// The first [`GeolocationResolver::resolve`] queries the provider; any
/// failure, including a timeout, settles on the fallback coordinate. Later
/// calls, concurrent or not, return the settled value without querying again.
pub struct GeolocationResolver<P> {
    provider: P,
    fallback: UserLocation,
    timeout: Duration,
    resolved: OnceCell<ResolvedLocation>,
    resolving: AtomicBool,
}

impl<P: PositionProvider> GeolocationResolver<P> {
    pub fn new(provider: P, fallback: UserLocation, timeout: Duration) -> Self {
        Self {
            provider,
            fallback,
            timeout,
            resolved: OnceCell::new(),
            resolving: AtomicBool::new(false),
        }
    }

    /// Uses the fallback coordinate and timeout from configuration.
    pub fn from_config(provider: P, config: &AppConfig) -> Self {
        Self::new(
            provider,
            config.fallback_location,
            Duration::from_secs(config.geolocation_timeout_secs),
        )
    }

    pub async fn resolve(&self) -> ResolvedLocation {
        *self
            .resolved
            .get_or_init(|| async {
                let _resolving = ResolvingGuard::enter(&self.resolving);
                self.query_provider().await
            })
            .await
    }

    async fn query_provider(&self) -> ResolvedLocation {
        let position = tokio::time::timeout(self.timeout, self.provider.current_position());
        let outcome = match position.await {
            Ok(Ok(location)) if location.is_valid() => Ok(location),
            Ok(Ok(location)) => Err(GeolocationError::InvalidPosition {
                lat: location.lat,
                lng: location.lng,
            }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(GeolocationError::Timeout {
                secs: self.timeout.as_secs(),
            }),
        };

        match outcome {
            Ok(location) => {
                tracing::info!(lat = location.lat, lng = location.lng, "user location resolved");
                ResolvedLocation {
                    location,
                    source: LocationSource::Device,
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    lat = self.fallback.lat,
                    lng = self.fallback.lng,
                    "falling back to default location"
                );
                ResolvedLocation {
                    location: self.fallback,
                    source: LocationSource::Fallback,
                }
            }
        }
    }

    /// The settled location, or `None` while unresolved.
    #[must_use]
    pub fn get(&self) -> Option<UserLocation> {
        self.resolved.get().map(|r| r.location)
    }

    #[must_use]
    pub fn state(&self) -> ResolutionState {
        match self.resolved.get() {
            Some(resolved) => ResolutionState::Resolved(*resolved),
            None if self.resolving.load(Ordering::SeqCst) => ResolutionState::Resolving,
            None => ResolutionState::Pending,
        }
    }
}

/// Clears the in-flight flag on completion or when the resolve future is dropped.
struct ResolvingGuard<'a>(&'a AtomicBool);

impl<'a> ResolvingGuard<'a> {
    fn enter(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
