//! # fieldmap-geo
//!
//! Geographic primitives for the fieldmap site cache: points, axis-aligned
//! latitude/longitude windows, and the pan classification that decides when
//! a map movement has left the already-fetched region.
//!
//! ## Coordinate conventions
//!
//! All coordinates are decimal degrees, positive north and positive east.
//! Window math is valid for latitudes within roughly ±85°; the longitude
//! correction clamps at the Web Mercator latitude limit (±85.0511°) so it
//! never divides by a vanishing cosine. Longitude wraparound at ±180° is
//! not handled.
//!
//! ## Example
//!
//! ```
//! use fieldmap_geo::{GeoPoint, GeoWindow, PanDirection};
//!
//! let center = GeoPoint::new(40.7596, -111.8867);
//! let window = GeoWindow::around(center, 10.0);
//!
//! assert_eq!(window.classify(center), PanDirection::Within);
//! assert!(window.contains(center));
//! ```

mod point;
mod window;

pub use point::GeoPoint;
pub use window::{GeoWindow, PanDirection};
