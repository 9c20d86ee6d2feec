//! Fetch coordinator state machine.
//!
//! The coordinator owns the fetched window, the annotation cache, and the
//! single logically-current fetch token. It is a plain synchronous state
//! machine: callers feed it location updates, region changes, and fetch
//! completions, and it answers with the actions to perform. All methods
//! must be called from one logical owner ([`crate::MapSession`] provides
//! that owner as a dedicated thread).

use crate::cache::AnnotationCache;
use crate::config::CoordinatorConfig;
use crate::error::FetchError;
use crate::site::{SiteAnnotation, SiteRecord};
use crate::FetchResult;
use fieldmap_geo::{GeoPoint, GeoWindow};
use tracing::{debug, trace, warn};

// ============================================================================
// Tokens and requests
// ============================================================================

/// Opaque identifier for a fetch request.
///
/// Issuing a new request supersedes the previous token; completions that
/// arrive tagged with a superseded token are discarded without touching
/// window or cache. That discard *is* the cancellation contract; the
/// underlying transport call is never aborted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchToken(u64);

/// A window to fetch, tagged with its token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchRequest {
    /// Token identifying this request.
    pub token: FetchToken,
    /// Region to fetch sites for.
    pub window: GeoWindow,
}

// ============================================================================
// State machine
// ============================================================================

/// Coordinator lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    /// No location seen yet; window uninitialized.
    Idle,
    /// Waiting for successive location updates to settle within the
    /// stabilization tolerance.
    AwaitingInitialFix,
    /// Exactly one request logically in flight.
    Fetching,
    /// Window established; pans outside it trigger delta fetches.
    Ready,
}

/// Actions the caller must carry out after feeding the coordinator an event.
#[derive(Debug)]
pub enum Action {
    /// Invoke the site fetch service for this request.
    Fetch(FetchRequest),
    /// Hand newly accepted annotations to the map renderer.
    Render(Vec<SiteAnnotation>),
    /// Report a fetch failure to the caller. Window and cache are unchanged.
    SurfaceError(FetchError),
}

/// The windowed site fetch state machine.
pub struct FetchCoordinator {
    config: CoordinatorConfig,
    state: CoordinatorState,
    window: Option<GeoWindow>,
    current_token: Option<FetchToken>,
    next_token: u64,
    last_location: Option<GeoPoint>,
    // Latch: the initial fetch fires once, no matter how many stable
    // updates follow.
    initial_fetch_issued: bool,
    cache: AnnotationCache,
}

impl FetchCoordinator {
    /// Create an idle coordinator with an empty cache.
    pub fn new(config: CoordinatorConfig) -> Self {
        FetchCoordinator {
            config,
            state: CoordinatorState::Idle,
            window: None,
            current_token: None,
            next_token: 0,
            last_location: None,
            initial_fetch_issued: false,
            cache: AnnotationCache::new(),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    /// The fetched window, once established.
    pub fn window(&self) -> Option<GeoWindow> {
        self.window
    }

    /// The annotation cache.
    pub fn cache(&self) -> &AnnotationCache {
        &self.cache
    }

    /// Pre-populate the cache, e.g. with a project's own persisted sites.
    ///
    /// Returns the annotations that were actually added so they can be
    /// rendered; already-known ids are skipped as in any merge.
    pub fn seed_sites(&mut self, records: Vec<SiteRecord>) -> Vec<SiteAnnotation> {
        let accepted = self.cache.merge(records);
        debug!("seeded cache with {} site(s)", accepted.len());
        accepted
    }

    /// Feed a location update from the location provider.
    ///
    /// The first update records a baseline; once an update lands within the
    /// stabilization tolerance of the previous one, the initial window is
    /// computed around it and the one-and-only initial fetch is issued.
    pub fn handle_location_update(&mut self, point: GeoPoint) -> Vec<Action> {
        let previous = self.last_location.replace(point);

        if self.state == CoordinatorState::Idle {
            self.state = CoordinatorState::AwaitingInitialFix;
            trace!("first location update; awaiting a stable fix");
            return Vec::new();
        }

        if self.initial_fetch_issued {
            return Vec::new();
        }

        let Some(previous) = previous else {
            return Vec::new();
        };

        let moved_km = previous.distance_km(&point);
        if moved_km > self.config.stabilization_tolerance_km {
            trace!(
                "location moved {moved_km:.1} km since last update; still settling"
            );
            return Vec::new();
        }

        self.initial_fetch_issued = true;
        let window = GeoWindow::around(point, self.config.fetch_range_km);
        self.window = Some(window);
        debug!(
            "location stable ({moved_km:.2} km); issuing initial fetch around ({:.4}, {:.4})",
            point.latitude, point.longitude
        );
        vec![self.issue_fetch(window)]
    }

    /// Feed a map region change (pan or zoom).
    ///
    /// A center outside the window at sufficient zoom expands the tracked
    /// window immediately and issues a delta fetch for the exposed strip.
    /// The expansion happens at issue time, not at completion: pan tracking
    /// is independent of fetch completion, and a new pan while a fetch is
    /// in flight simply supersedes its token.
    pub fn handle_region_changed(&mut self, center: GeoPoint, zoom: f64) -> Vec<Action> {
        let Some(window) = self.window else {
            return Vec::new();
        };

        if zoom < self.config.min_fetch_zoom {
            trace!("zoom {zoom:.1} below fetch threshold; ignoring region change");
            return Vec::new();
        }

        let direction = window.classify(center);
        let Some(delta) = window.delta(direction, center.latitude, self.config.fetch_range_km)
        else {
            // Within the window; nothing to fetch.
            return Vec::new();
        };

        let mut expanded = window;
        expanded.expand(direction, center.latitude, self.config.fetch_range_km);
        self.window = Some(expanded);

        debug!("pan crossed window edge ({direction:?}); issuing delta fetch");
        vec![self.issue_fetch(delta)]
    }

    /// Feed a fetch completion.
    ///
    /// Completions for superseded tokens are discarded silently with no
    /// state change. A matching success merges into the cache and yields
    /// the newly accepted annotations; a matching failure surfaces the
    /// error and leaves window and cache untouched.
    pub fn handle_fetch_completed(&mut self, token: FetchToken, result: FetchResult) -> Vec<Action> {
        if self.current_token != Some(token) {
            debug!("discarding stale completion for {token:?}");
            return Vec::new();
        }
        self.current_token = None;
        self.state = CoordinatorState::Ready;

        match result {
            Ok(records) => {
                let received = records.len();
                let accepted = self.cache.merge(records);
                debug!(
                    "fetch {token:?} returned {received} site(s), {} new",
                    accepted.len()
                );
                if accepted.is_empty() {
                    Vec::new()
                } else {
                    vec![Action::Render(accepted)]
                }
            }
            Err(error) => {
                warn!("fetch {token:?} failed: {error}");
                vec![Action::SurfaceError(error)]
            }
        }
    }

    /// Reissue a fetch for the full tracked window.
    ///
    /// Manual retry hook for after a surfaced failure; supersedes any fetch
    /// still in flight. Does nothing before the window is established.
    pub fn refetch_window(&mut self) -> Vec<Action> {
        let Some(window) = self.window else {
            return Vec::new();
        };
        debug!("refetching full window");
        vec![self.issue_fetch(window)]
    }

    fn issue_fetch(&mut self, window: GeoWindow) -> Action {
        let token = FetchToken(self.next_token);
        self.next_token += 1;
        self.current_token = Some(token);
        self.state = CoordinatorState::Fetching;
        Action::Fetch(FetchRequest { token, window })
    }
}
