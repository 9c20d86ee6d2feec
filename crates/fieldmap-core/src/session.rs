//! Session thread tying the coordinator to its collaborators.
//!
//! Location updates, region changes, and fetch completions all arrive as
//! asynchronous callbacks. None of them may touch the window, the cache,
//! or the state machine concurrently, so the session funnels every event
//! through one channel into a dedicated owner thread. Fetch services do
//! their I/O wherever they like and post results back through the same
//! channel; completions are applied in completion order and stale tokens
//! are discarded by the coordinator.

use crate::coordinator::{Action, FetchCoordinator, FetchToken};
use crate::config::CoordinatorConfig;
use crate::service::{AnnotationSink, FetchCompletion, SiteFetchService};
use crate::site::SiteRecord;
use crate::FetchResult;
use crossbeam_channel::{unbounded, Sender};
use fieldmap_geo::GeoPoint;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::debug;

/// Events serialized onto the session thread.
#[derive(Debug)]
pub enum MapEvent {
    /// A location provider update.
    LocationUpdate(GeoPoint),
    /// The map's visible region changed.
    RegionChanged {
        /// New map center.
        center: GeoPoint,
        /// Current zoom level (larger = closer).
        zoom: f64,
    },
    /// A fetch resolved.
    FetchCompleted {
        /// Token the fetch was issued under.
        token: FetchToken,
        /// Sites for the requested window, or the error to surface.
        result: FetchResult,
    },
    /// Pre-populate the cache with locally persisted sites.
    SeedSites(Vec<SiteRecord>),
    /// Reissue a fetch for the full tracked window.
    Refetch,
    /// Stop the session thread.
    Shutdown,
}

/// Handle to a running map session.
///
/// The session owns a [`FetchCoordinator`] on a dedicated thread; handle
/// methods only enqueue events and never block. Dropping the handle stops
/// the thread without waiting for it; use [`MapSession::shutdown`] to
/// stop and join.
pub struct MapSession {
    events: Sender<MapEvent>,
    thread: Option<JoinHandle<()>>,
}

impl MapSession {
    /// Spawn a session thread around a fresh coordinator.
    pub fn spawn<S, R>(config: CoordinatorConfig, service: Arc<S>, mut sink: R) -> Self
    where
        S: SiteFetchService + 'static,
        R: AnnotationSink + 'static,
    {
        let (events, inbox) = unbounded::<MapEvent>();
        let completions = events.clone();

        let thread = thread::spawn(move || {
            let mut coordinator = FetchCoordinator::new(config);

            while let Ok(event) = inbox.recv() {
                let actions = match event {
                    MapEvent::Shutdown => {
                        debug!("map session shutting down");
                        break;
                    }
                    MapEvent::LocationUpdate(point) => coordinator.handle_location_update(point),
                    MapEvent::RegionChanged { center, zoom } => {
                        coordinator.handle_region_changed(center, zoom)
                    }
                    MapEvent::FetchCompleted { token, result } => {
                        coordinator.handle_fetch_completed(token, result)
                    }
                    MapEvent::SeedSites(records) => {
                        let accepted = coordinator.seed_sites(records);
                        if accepted.is_empty() {
                            Vec::new()
                        } else {
                            vec![Action::Render(accepted)]
                        }
                    }
                    MapEvent::Refetch => coordinator.refetch_window(),
                };

                for action in actions {
                    match action {
                        Action::Fetch(request) => {
                            let posts = completions.clone();
                            let completion =
                                FetchCompletion::new(request.token, move |token, result| {
                                    // The session may already be gone; a late
                                    // completion has nowhere to go and that is fine.
                                    let _ = posts.send(MapEvent::FetchCompleted { token, result });
                                });
                            service.fetch(request.window, completion);
                        }
                        Action::Render(annotations) => sink.add_annotations(&annotations),
                        Action::SurfaceError(error) => sink.fetch_failed(&error),
                    }
                }
            }
        });

        MapSession {
            events,
            thread: Some(thread),
        }
    }

    /// Forward a location provider update.
    pub fn update_location(&self, point: GeoPoint) {
        let _ = self.events.send(MapEvent::LocationUpdate(point));
    }

    /// Forward a map region change.
    pub fn region_changed(&self, center: GeoPoint, zoom: f64) {
        let _ = self.events.send(MapEvent::RegionChanged { center, zoom });
    }

    /// Seed the cache with locally persisted sites.
    pub fn seed_sites(&self, records: Vec<SiteRecord>) {
        let _ = self.events.send(MapEvent::SeedSites(records));
    }

    /// Reissue a fetch for the full tracked window (manual retry).
    pub fn refetch(&self) {
        let _ = self.events.send(MapEvent::Refetch);
    }

    /// Stop the session thread and wait for it to finish.
    pub fn shutdown(mut self) {
        let _ = self.events.send(MapEvent::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MapSession {
    fn drop(&mut self) {
        let _ = self.events.send(MapEvent::Shutdown);
        // Don't join in drop; the thread exits on its own.
    }
}
