use healthgis_core::{AppConfig, UserLocation};
use healthgis_finder::{
    GeolocationResolver, LocationSource, ManualPosition, ResolvedLocation, UnavailablePosition,
};

use crate::LocationArgs;

impl LocationArgs {
    pub(crate) fn position(self) -> Option<UserLocation> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(UserLocation::new(lat, lng)),
            _ => None,
        }
    }
}

/// Resolves the user location once: the `--lat/--lng` pair when given and
/// valid, otherwise the configured fallback.
pub(crate) async fn resolve_location(args: LocationArgs, config: &AppConfig) -> ResolvedLocation {
    let resolved = match args.position() {
        Some(position) => {
            GeolocationResolver::from_config(ManualPosition(position), config)
                .resolve()
                .await
        }
        None => {
            GeolocationResolver::from_config(UnavailablePosition, config)
                .resolve()
                .await
        }
    };

    if resolved.source == LocationSource::Fallback {
        eprintln!(
            "using default location ({:.4}, {:.4}); pass --lat and --lng to set your own",
            resolved.location.lat, resolved.location.lng
        );
    }
    resolved
}
