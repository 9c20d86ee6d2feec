//! Boundary traits for the site database and the map renderer.

use crate::coordinator::FetchToken;
use crate::error::FetchError;
use crate::site::SiteAnnotation;
use crate::FetchResult;

/// One-shot completion handle for an in-flight fetch.
///
/// The service resolves it exactly once, from any thread; the result is
/// routed back to the single owner of the coordinator tagged with the
/// token it was issued under. Resolving a completion whose token has been
/// superseded is harmless: the coordinator discards it.
pub struct FetchCompletion {
    token: FetchToken,
    notify: Box<dyn FnOnce(FetchToken, FetchResult) + Send>,
}

impl FetchCompletion {
    /// Create a completion that reports through `notify`.
    pub fn new(
        token: FetchToken,
        notify: impl FnOnce(FetchToken, FetchResult) + Send + 'static,
    ) -> Self {
        FetchCompletion {
            token,
            notify: Box::new(notify),
        }
    }

    /// Token this completion reports under.
    pub fn token(&self) -> FetchToken {
        self.token
    }

    /// Deliver the fetch result.
    pub fn resolve(self, result: FetchResult) {
        (self.notify)(self.token, result);
    }
}

impl std::fmt::Debug for FetchCompletion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchCompletion")
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

/// A source of site records for a bounding window.
///
/// `fetch` must not block the caller: implementations run their work on
/// their own threads (or answer from memory) and resolve the completion
/// when done. The service may be invoked again before a prior call
/// resolves; the coordinator relies on fire-another-and-ignore-stale, not
/// on transport-level cancellation.
pub trait SiteFetchService: Send + Sync {
    /// Fetch all sites inside `window` and resolve `completion` with the
    /// outcome.
    fn fetch(&self, window: fieldmap_geo::GeoWindow, completion: FetchCompletion);
}

/// Receiver for accepted annotations and surfaced failures: in the app,
/// the map view.
pub trait AnnotationSink: Send {
    /// Display newly accepted annotations. Called only with non-empty,
    /// never-before-seen batches.
    fn add_annotations(&mut self, annotations: &[SiteAnnotation]);

    /// A fetch failed; nothing was added this round.
    fn fetch_failed(&mut self, error: &FetchError);
}
