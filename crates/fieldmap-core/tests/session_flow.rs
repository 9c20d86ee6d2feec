//! End-to-end tests for the map session: stabilized fix, one fetch,
//! deduplicated annotations handed to the renderer exactly once.

use crossbeam_channel::{unbounded, Receiver, Sender};
use fieldmap_core::{
    AnnotationSink, CoordinatorConfig, FetchCompletion, FetchError, FetchResult, MapSession,
    SiteAnnotation, SiteFetchService, SiteRecord,
};
use fieldmap_geo::{GeoPoint, GeoWindow};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetch service that answers from a script and records every request.
struct ScriptedService {
    responses: Mutex<Vec<FetchResult>>,
    requests: Mutex<Vec<GeoWindow>>,
}

impl ScriptedService {
    fn new(responses: Vec<FetchResult>) -> Arc<Self> {
        Arc::new(ScriptedService {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn request(&self, index: usize) -> GeoWindow {
        self.requests.lock().unwrap()[index]
    }
}

impl SiteFetchService for ScriptedService {
    fn fetch(&self, window: GeoWindow, completion: FetchCompletion) {
        self.requests.lock().unwrap().push(window);
        let mut responses = self.responses.lock().unwrap();
        let result = if responses.is_empty() {
            Ok(Vec::new())
        } else {
            responses.remove(0)
        };
        completion.resolve(result);
    }
}

/// Sink that forwards renderer calls into channels the test can wait on.
struct ChannelSink {
    rendered: Sender<Vec<SiteAnnotation>>,
    failures: Sender<FetchError>,
}

impl AnnotationSink for ChannelSink {
    fn add_annotations(&mut self, annotations: &[SiteAnnotation]) {
        self.rendered.send(annotations.to_vec()).unwrap();
    }

    fn fetch_failed(&mut self, error: &FetchError) {
        self.failures.send(error.clone()).unwrap();
    }
}

fn channel_sink() -> (ChannelSink, Receiver<Vec<SiteAnnotation>>, Receiver<FetchError>) {
    let (rendered_tx, rendered_rx) = unbounded();
    let (failures_tx, failures_rx) = unbounded();
    (
        ChannelSink {
            rendered: rendered_tx,
            failures: failures_tx,
        },
        rendered_rx,
        failures_rx,
    )
}

fn site(id: &str, lat: f64, lon: f64) -> SiteRecord {
    SiteRecord::new(id, format!("site {id}"), GeoPoint::new(lat, lon))
}

#[test]
fn test_stabilized_fix_fetches_and_renders_once() {
    let fix = GeoPoint::new(40.7596, -111.8867);
    let service = ScriptedService::new(vec![Ok(vec![
        site("a", 40.76, -111.89),
        site("b", 40.75, -111.88),
        site("c", 40.77, -111.87),
    ])]);
    let (sink, rendered, _failures) = channel_sink();

    let session = MapSession::spawn(CoordinatorConfig::default(), Arc::clone(&service), sink);

    // Baseline, then a stable update within tolerance.
    session.update_location(fix);
    session.update_location(fix);

    let annotations = rendered.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(annotations.len(), 3);
    let mut ids: Vec<&str> = annotations.iter().map(|a| a.id()).collect();
    ids.sort_unstable();
    assert_eq!(ids, ["a", "b", "c"]);

    assert_eq!(service.request_count(), 1);
    assert!(service.request(0).contains(fix));

    // Further stable updates must not refetch. Seed a sentinel and wait for
    // its render to know the session has drained everything before it.
    session.update_location(fix);
    session.seed_sites(vec![site("sentinel", 40.7, -111.9)]);

    let seeded = rendered.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(seeded.len(), 1);
    assert_eq!(seeded[0].id(), "sentinel");
    assert_eq!(service.request_count(), 1);

    session.shutdown();
}

#[test]
fn test_failure_is_surfaced_and_refetch_recovers() {
    let fix = GeoPoint::new(40.7596, -111.8867);
    let service = ScriptedService::new(vec![
        Err(FetchError::transport("connection reset")),
        Ok(vec![site("a", 40.76, -111.89)]),
    ]);
    let (sink, rendered, failures) = channel_sink();

    let session = MapSession::spawn(CoordinatorConfig::default(), Arc::clone(&service), sink);
    session.update_location(fix);
    session.update_location(fix);

    let error = failures.recv_timeout(RECV_TIMEOUT).unwrap();
    assert!(matches!(error, FetchError::Transport { .. }));

    // Manual retry fetches the same full window and succeeds.
    session.refetch();
    let annotations = rendered.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(annotations.len(), 1);

    assert_eq!(service.request_count(), 2);
    assert_eq!(service.request(0), service.request(1));

    session.shutdown();
}

#[test]
fn test_duplicate_sites_from_delta_fetch_are_not_rerendered() {
    let fix = GeoPoint::new(40.7596, -111.8867);
    let service = ScriptedService::new(vec![
        Ok(vec![site("a", 40.76, -111.89), site("b", 40.75, -111.88)]),
        // Delta fetch returns one known site and one new one.
        Ok(vec![site("a", 40.76, -111.89), site("d", 40.76, -111.70)]),
    ]);
    let (sink, rendered, _failures) = channel_sink();

    let session = MapSession::spawn(CoordinatorConfig::default(), Arc::clone(&service), sink);
    session.update_location(fix);
    session.update_location(fix);

    let initial = rendered.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(initial.len(), 2);

    // Pan east of the initial window at high zoom.
    let east = GeoPoint::new(fix.latitude, fix.longitude + 1.0);
    session.region_changed(east, 15.0);

    let delta = rendered.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_eq!(delta.len(), 1);
    assert_eq!(delta[0].id(), "d");
    assert_eq!(service.request_count(), 2);

    session.shutdown();
}
