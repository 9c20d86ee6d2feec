//! Axis-aligned latitude/longitude windows and pan classification.
//!
//! A window tracks the rectangular region for which sites have already been
//! fetched. Panning outside the window produces a delta strip adjacent to
//! the crossed edge, so only the newly exposed area needs to be requested.

use crate::GeoPoint;
use serde::{Deserialize, Serialize};

/// Spherical Earth radius used for window sizing, in kilometers.
const EARTH_RADIUS_KM: f64 = 6378.0;

/// Latitude limit for the longitude correction (the Web Mercator limit).
///
/// The correction divides by cos(latitude), which vanishes at the poles.
/// Latitudes are clamped to this value before the division, so windows
/// requested closer to a pole degrade to the width they would have at
/// ±85.0511° instead of blowing up.
const MAX_CORRECTION_LAT_DEG: f64 = 85.0511;

/// Relationship of a map center to the currently fetched window.
///
/// Classification uses a fixed check order (below, left, above, right,
/// within) so corner crossings are deterministic: a center that is both
/// below and left of the window is always reported as `Below`. The
/// asymmetry is inherited behavior and is asserted by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanDirection {
    /// Center is inside the window; no fetch is needed.
    Within,
    /// Center crossed the western edge.
    Left,
    /// Center crossed the eastern edge.
    Right,
    /// Center crossed the northern edge.
    Above,
    /// Center crossed the southern edge.
    Below,
}

/// An axis-aligned latitude/longitude rectangle.
///
/// Invariant: `min.latitude <= max.latitude` and
/// `min.longitude <= max.longitude`. Windows only ever grow; the
/// coordinator expands an edge when a pan moves outside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoWindow {
    /// Southwest corner.
    pub min: GeoPoint,
    /// Northeast corner.
    pub max: GeoPoint,
}

/// Latitude and longitude spans (in degrees) covering `range_km` at the
/// given reference latitude.
fn degree_spans(reference_latitude: f64, range_km: f64) -> (f64, f64) {
    let delta_lat = (range_km / EARTH_RADIUS_KM).to_degrees();
    let clamped = reference_latitude.clamp(-MAX_CORRECTION_LAT_DEG, MAX_CORRECTION_LAT_DEG);
    let delta_lon = delta_lat / clamped.to_radians().cos();
    (delta_lat, delta_lon)
}

impl GeoWindow {
    /// Create a window centered on a point, extending `range_km` kilometers
    /// in every compass direction.
    ///
    /// The longitude half-span is widened by 1/cos(latitude) to compensate
    /// for meridian convergence away from the equator.
    pub fn around(center: GeoPoint, range_km: f64) -> Self {
        let (delta_lat, delta_lon) = degree_spans(center.latitude, range_km);
        GeoWindow {
            min: GeoPoint::new(center.latitude - delta_lat, center.longitude - delta_lon),
            max: GeoPoint::new(center.latitude + delta_lat, center.longitude + delta_lon),
        }
    }

    /// Check whether a point lies inside the window (edges inclusive).
    pub fn contains(&self, point: GeoPoint) -> bool {
        self.classify(point) == PanDirection::Within
    }

    /// Classify a map center relative to this window.
    ///
    /// The checks run in a fixed order and the first match wins; see
    /// [`PanDirection`] for the corner-crossing consequences.
    pub fn classify(&self, center: GeoPoint) -> PanDirection {
        if center.latitude < self.min.latitude {
            PanDirection::Below
        } else if center.longitude < self.min.longitude {
            PanDirection::Left
        } else if center.latitude > self.max.latitude {
            PanDirection::Above
        } else if center.longitude > self.max.longitude {
            PanDirection::Right
        } else {
            PanDirection::Within
        }
    }

    /// Compute the delta strip to fetch after a pan crossed one edge.
    ///
    /// The strip extends `range_km` outward from the crossed edge and spans
    /// the window's full extent along the other axis, so it shares exactly
    /// one edge with this window: no gap, no overlap. `reference_latitude`
    /// is the latitude at which the longitude span is corrected (the map
    /// center that triggered the pan).
    ///
    /// Returns `None` for [`PanDirection::Within`], which needs no fetch.
    pub fn delta(
        &self,
        direction: PanDirection,
        reference_latitude: f64,
        range_km: f64,
    ) -> Option<GeoWindow> {
        let (delta_lat, delta_lon) = degree_spans(reference_latitude, range_km);

        match direction {
            PanDirection::Within => None,
            PanDirection::Left => Some(GeoWindow {
                min: GeoPoint::new(self.min.latitude, self.min.longitude - delta_lon),
                max: GeoPoint::new(self.max.latitude, self.min.longitude),
            }),
            PanDirection::Right => Some(GeoWindow {
                min: GeoPoint::new(self.min.latitude, self.max.longitude),
                max: GeoPoint::new(self.max.latitude, self.max.longitude + delta_lon),
            }),
            PanDirection::Above => Some(GeoWindow {
                min: GeoPoint::new(self.max.latitude, self.min.longitude),
                max: GeoPoint::new(self.max.latitude + delta_lat, self.max.longitude),
            }),
            PanDirection::Below => Some(GeoWindow {
                min: GeoPoint::new(self.min.latitude - delta_lat, self.min.longitude),
                max: GeoPoint::new(self.min.latitude, self.max.longitude),
            }),
        }
    }

    /// Grow this window outward by `range_km` on the crossed side.
    ///
    /// This is the optimistic expansion the coordinator applies at the
    /// moment a delta fetch is issued; the window covers the requested
    /// strip before the fetch resolves. `Within` leaves the window
    /// untouched.
    pub fn expand(&mut self, direction: PanDirection, reference_latitude: f64, range_km: f64) {
        let (delta_lat, delta_lon) = degree_spans(reference_latitude, range_km);

        match direction {
            PanDirection::Within => {}
            PanDirection::Left => self.min.longitude -= delta_lon,
            PanDirection::Right => self.max.longitude += delta_lon,
            PanDirection::Above => self.max.latitude += delta_lat,
            PanDirection::Below => self.min.latitude -= delta_lat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_window_contains_its_center() {
        for &(lat, lon, range) in &[
            (40.7596, -111.8867, 10.0),
            (0.0, 0.0, 1.0),
            (-33.8688, 151.2093, 50.0),
            (64.1466, -21.9426, 25.0),
        ] {
            let center = GeoPoint::new(lat, lon);
            let window = GeoWindow::around(center, range);
            assert!(window.contains(center), "center escaped window at ({lat}, {lon})");
            assert!(window.min.latitude <= window.max.latitude);
            assert!(window.min.longitude <= window.max.longitude);
        }
    }

    #[test]
    fn test_window_is_symmetric_around_center() {
        let center = GeoPoint::new(40.0, -112.0);
        let window = GeoWindow::around(center, 10.0);
        assert_relative_eq!(
            center.latitude - window.min.latitude,
            window.max.latitude - center.latitude,
            epsilon = 1e-12
        );
        assert_relative_eq!(
            center.longitude - window.min.longitude,
            window.max.longitude - center.longitude,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_longitude_span_widens_away_from_equator() {
        let equator = GeoWindow::around(GeoPoint::new(0.0, 0.0), 10.0);
        let northern = GeoWindow::around(GeoPoint::new(60.0, 0.0), 10.0);

        let equator_span = equator.max.longitude - equator.min.longitude;
        let northern_span = northern.max.longitude - northern.min.longitude;

        // cos(60°) = 0.5, so the span doubles
        assert_relative_eq!(northern_span, equator_span * 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_polar_window_stays_finite() {
        let window = GeoWindow::around(GeoPoint::new(89.9, 0.0), 10.0);
        assert!(window.min.longitude.is_finite());
        assert!(window.max.longitude.is_finite());

        // Clamped to the Web Mercator limit, not the actual latitude
        let limit = GeoWindow::around(GeoPoint::new(85.0511, 0.0), 10.0);
        let polar_span = window.max.longitude - window.min.longitude;
        let limit_span = limit.max.longitude - limit.min.longitude;
        assert_relative_eq!(polar_span, limit_span, epsilon = 1e-9);
    }

    #[test]
    fn test_classification_order() {
        // Concrete table: window over the Salt Lake valley
        let window = GeoWindow {
            min: GeoPoint::new(40.0, -112.0),
            max: GeoPoint::new(40.1, -111.9),
        };

        assert_eq!(window.classify(GeoPoint::new(39.9, -111.95)), PanDirection::Below);
        assert_eq!(window.classify(GeoPoint::new(40.05, -112.1)), PanDirection::Left);
        assert_eq!(window.classify(GeoPoint::new(40.2, -111.95)), PanDirection::Above);
        assert_eq!(window.classify(GeoPoint::new(40.05, -111.8)), PanDirection::Right);
        assert_eq!(window.classify(GeoPoint::new(40.05, -111.95)), PanDirection::Within);
    }

    #[test]
    fn test_corner_crossings_use_first_match() {
        let window = GeoWindow {
            min: GeoPoint::new(40.0, -112.0),
            max: GeoPoint::new(40.1, -111.9),
        };

        // Below-and-left reports Below; the latitude check runs first
        assert_eq!(window.classify(GeoPoint::new(39.9, -112.1)), PanDirection::Below);
        // Above-and-left reports Left; the left check precedes the above check
        assert_eq!(window.classify(GeoPoint::new(40.2, -112.1)), PanDirection::Left);
        // Above-and-right reports Above; no earlier check matches
        assert_eq!(window.classify(GeoPoint::new(40.2, -111.8)), PanDirection::Above);
    }

    #[test]
    fn test_edges_are_inside() {
        let window = GeoWindow {
            min: GeoPoint::new(40.0, -112.0),
            max: GeoPoint::new(40.1, -111.9),
        };
        assert_eq!(window.classify(window.min), PanDirection::Within);
        assert_eq!(window.classify(window.max), PanDirection::Within);
    }

    #[test]
    fn test_delta_strip_is_adjacent() {
        let window = GeoWindow::around(GeoPoint::new(40.0, -112.0), 10.0);

        let left = window.delta(PanDirection::Left, 40.0, 10.0).unwrap();
        assert_relative_eq!(left.max.longitude, window.min.longitude, epsilon = 1e-12);
        assert_relative_eq!(left.min.latitude, window.min.latitude, epsilon = 1e-12);
        assert_relative_eq!(left.max.latitude, window.max.latitude, epsilon = 1e-12);

        let right = window.delta(PanDirection::Right, 40.0, 10.0).unwrap();
        assert_relative_eq!(right.min.longitude, window.max.longitude, epsilon = 1e-12);

        let above = window.delta(PanDirection::Above, 40.0, 10.0).unwrap();
        assert_relative_eq!(above.min.latitude, window.max.latitude, epsilon = 1e-12);
        assert_relative_eq!(above.min.longitude, window.min.longitude, epsilon = 1e-12);
        assert_relative_eq!(above.max.longitude, window.max.longitude, epsilon = 1e-12);

        let below = window.delta(PanDirection::Below, 40.0, 10.0).unwrap();
        assert_relative_eq!(below.max.latitude, window.min.latitude, epsilon = 1e-12);
    }

    #[test]
    fn test_delta_for_within_is_none() {
        let window = GeoWindow::around(GeoPoint::new(40.0, -112.0), 10.0);
        assert!(window.delta(PanDirection::Within, 40.0, 10.0).is_none());
    }

    #[test]
    fn test_expand_matches_delta_far_edge() {
        let original = GeoWindow::around(GeoPoint::new(40.0, -112.0), 10.0);

        let delta = original.delta(PanDirection::Left, 40.05, 10.0).unwrap();
        let mut expanded = original;
        expanded.expand(PanDirection::Left, 40.05, 10.0);

        // Expansion covers exactly the delta strip on the crossed side
        assert_relative_eq!(expanded.min.longitude, delta.min.longitude, epsilon = 1e-12);
        // Other edges untouched
        assert_relative_eq!(expanded.max.longitude, original.max.longitude, epsilon = 1e-12);
        assert_relative_eq!(expanded.min.latitude, original.min.latitude, epsilon = 1e-12);
        assert_relative_eq!(expanded.max.latitude, original.max.latitude, epsilon = 1e-12);
    }

    #[test]
    fn test_expand_within_is_noop() {
        let original = GeoWindow::around(GeoPoint::new(40.0, -112.0), 10.0);
        let mut window = original;
        window.expand(PanDirection::Within, 40.0, 10.0);
        assert_eq!(window, original);
    }
}
