//! Online/offline switching between the remote database and the store.

use crate::http::HttpSiteService;
use crate::store::CachedSiteStore;
use fieldmap_core::{FetchCompletion, SiteFetchService};
use fieldmap_geo::GeoWindow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Fetch service that prefers the remote database and falls back to the
/// local store when offline.
///
/// While online, every successful remote batch is teed into the store
/// before being forwarded, so the sites remain queryable once the
/// connection drops. The online flag is owned by the caller (whatever
/// reachability signal the platform provides) via [`set_online`].
///
/// [`set_online`]: FallbackSiteService::set_online
#[derive(Debug)]
pub struct FallbackSiteService {
    remote: HttpSiteService,
    store: Arc<CachedSiteStore>,
    online: AtomicBool,
}

impl FallbackSiteService {
    /// Create a fallback service; starts online.
    pub fn new(remote: HttpSiteService, store: Arc<CachedSiteStore>) -> Self {
        FallbackSiteService {
            remote,
            store,
            online: AtomicBool::new(true),
        }
    }

    /// Flip between remote fetching and offline store queries.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Relaxed);
    }

    /// Whether fetches currently go to the remote database.
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Relaxed)
    }

    /// The shared offline store.
    pub fn store(&self) -> &Arc<CachedSiteStore> {
        &self.store
    }
}

impl SiteFetchService for FallbackSiteService {
    fn fetch(&self, window: GeoWindow, completion: FetchCompletion) {
        if !self.is_online() {
            debug!("offline; answering window query from the local store");
            self.store.fetch(window, completion);
            return;
        }

        let store = Arc::clone(&self.store);
        let tee = FetchCompletion::new(completion.token(), move |_token, result| {
            if let Ok(sites) = &result {
                if let Err(error) = store.record(sites.iter().cloned()) {
                    warn!("failed to record fetched sites offline: {error}");
                }
            }
            completion.resolve(result);
        });
        self.remote.fetch(window, tee);
    }
}
