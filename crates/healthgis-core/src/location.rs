use serde::{Deserialize, Serialize};

/// A user's position in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub lat: f64,
    pub lng: f64,
}

impl UserLocation {
    /// Centre of Lilongwe, the default fallback when no device fix is available.
    pub const LILONGWE: Self = Self {
        lat: -13.962_6,
        lng: 33.774_1,
    };

    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns `true` when both components are finite and inside WGS84 bounds.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lilongwe_is_valid() {
        assert!(UserLocation::LILONGWE.is_valid());
    }

    #[test]
    fn rejects_out_of_range_and_nan() {
        assert!(!UserLocation::new(95.0, 10.0).is_valid());
        assert!(!UserLocation::new(10.0, -181.0).is_valid());
        assert!(!UserLocation::new(f64::NAN, 10.0).is_valid());
    }
}
