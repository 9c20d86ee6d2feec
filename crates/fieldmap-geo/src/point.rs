//! Geographic point type and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used for distance calculations, in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in degrees (positive = north).
    pub latitude: f64,
    /// Longitude in degrees (positive = east).
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point from latitude and longitude in degrees.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        GeoPoint {
            latitude,
            longitude,
        }
    }

    /// Great-circle distance to another point using the haversine formula.
    ///
    /// Returns the distance in kilometers.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let lat1_rad = self.latitude.to_radians();
        let lat2_rad = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (delta_lat / 2.0).sin().powi(2)
            + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();

        EARTH_RADIUS_KM * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_between_known_cities() {
        // Salt Lake City to Provo is approximately 63 km
        let slc = GeoPoint::new(40.7608, -111.8910);
        let provo = GeoPoint::new(40.2338, -111.6585);
        let dist = slc.distance_km(&provo);
        assert!((dist - 63.0).abs() < 3.0, "got {dist}");
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(47.6062, -122.3321);
        let b = GeoPoint::new(45.5152, -122.6784);
        assert!((a.distance_km(&b) - b.distance_km(&a)).abs() < 1e-9);
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let p = GeoPoint::new(40.0, -112.0);
        assert!(p.distance_km(&p) < 1e-9);
    }
}
