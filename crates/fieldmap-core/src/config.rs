//! Coordinator configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the fetch coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Extent of each fetch window and delta strip, in kilometers.
    pub fetch_range_km: f64,
    /// Location updates closer than this to the previous update count as a
    /// stable fix and trigger the initial fetch, in kilometers.
    pub stabilization_tolerance_km: f64,
    /// Minimum zoom level at which pans outside the window trigger a delta
    /// fetch. Zoomed-out region changes below this level are ignored so a
    /// continent-wide view does not flood the site database.
    pub min_fetch_zoom: f64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        CoordinatorConfig {
            fetch_range_km: 10.0,
            stabilization_tolerance_km: 5.0,
            min_fetch_zoom: 10.0,
        }
    }
}
