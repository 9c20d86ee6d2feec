//! # fieldmap-core
//!
//! The incremental site fetch-and-cache engine behind the fieldmap map view.
//!
//! The core tracks a rectangular latitude/longitude *window* of already
//! fetched sampling sites. Map movement is classified against that window;
//! panning outside it triggers a *delta fetch* for just the newly exposed
//! strip, and results are merged into a deduplicating annotation cache
//! before being handed to the renderer.
//!
//! ## Pieces
//!
//! - [`FetchCoordinator`]: the state machine. Waits for a stable location
//!   fix, issues the initial window fetch, and turns pans outside the
//!   window into delta fetches. Owns the single logically-current
//!   [`FetchToken`]; completions for superseded tokens are discarded.
//! - [`AnnotationCache`]: append-only cache keyed by site id. Two records
//!   with the same id are the same site; the first cached copy wins.
//! - [`MapSession`]: a dedicated owner thread that serializes location
//!   updates, region changes, and fetch completions onto the coordinator,
//!   preserving the single-writer discipline over window and cache.
//! - [`SiteFetchService`] / [`AnnotationSink`]: the boundary traits for the
//!   remote site database and the map renderer.
//!
//! ## Example
//!
//! ```
//! use fieldmap_core::{CoordinatorConfig, FetchCoordinator, Action};
//! use fieldmap_geo::GeoPoint;
//!
//! let mut coordinator = FetchCoordinator::new(CoordinatorConfig::default());
//! let fix = GeoPoint::new(40.7596, -111.8867);
//!
//! // First update records a baseline; the second, stable one fetches.
//! assert!(coordinator.handle_location_update(fix).is_empty());
//! let actions = coordinator.handle_location_update(fix);
//! assert!(matches!(actions.as_slice(), [Action::Fetch(_)]));
//! ```

mod cache;
mod config;
mod coordinator;
mod error;
mod service;
mod session;
mod site;

pub use cache::AnnotationCache;
pub use config::CoordinatorConfig;
pub use coordinator::{
    Action, CoordinatorState, FetchCoordinator, FetchRequest, FetchToken,
};
pub use error::FetchError;
pub use service::{AnnotationSink, FetchCompletion, SiteFetchService};
pub use session::{MapEvent, MapSession};
pub use site::{SiteAnnotation, SiteRecord, ELEVATION_UNKNOWN};

/// Result of a site fetch: the records for the requested window, or the
/// error to surface.
pub type FetchResult = Result<Vec<SiteRecord>, FetchError>;
