//! In-memory store of previously fetched sites for offline queries.

use fieldmap_core::{FetchCompletion, FetchError, SiteFetchService, SiteRecord};
use fieldmap_geo::GeoWindow;
use std::collections::HashMap;
use std::sync::RwLock;

/// Thread-safe store of site records keyed by id.
///
/// Holds everything the remote database has returned so far and answers
/// bounding-window queries from memory when the network is unavailable.
/// Like the annotation cache, the store is append-only per id: a record
/// arriving with a known id is ignored.
#[derive(Debug, Default)]
pub struct CachedSiteStore {
    sites: RwLock<HashMap<String, SiteRecord>>,
}

impl CachedSiteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add records to the store, skipping ids already present.
    ///
    /// Returns the number of records actually added.
    pub fn record(
        &self,
        records: impl IntoIterator<Item = SiteRecord>,
    ) -> Result<usize, FetchError> {
        let mut sites = self.sites.write().map_err(|_| FetchError::CacheLockPoisoned)?;
        let mut added = 0;
        for record in records {
            if !sites.contains_key(&record.id) {
                sites.insert(record.id.clone(), record);
                added += 1;
            }
        }
        Ok(added)
    }

    /// Return all stored sites whose location falls inside `window`.
    pub fn query(&self, window: &GeoWindow) -> Result<Vec<SiteRecord>, FetchError> {
        let sites = self.sites.read().map_err(|_| FetchError::CacheLockPoisoned)?;
        Ok(sites
            .values()
            .filter(|site| window.contains(site.location))
            .cloned()
            .collect())
    }

    /// Number of stored sites.
    ///
    /// Advisory accessor: a poisoned lock reads as zero rather than
    /// erroring, since callers use this for display and diagnostics. The
    /// fetch paths ([`record`](Self::record) and [`query`](Self::query))
    /// surface [`FetchError::CacheLockPoisoned`] instead.
    pub fn len(&self) -> usize {
        self.sites.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Whether the store is empty. Advisory, like [`len`](Self::len); a
    /// poisoned lock reads as empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SiteFetchService for CachedSiteStore {
    /// Answer a fetch from memory.
    ///
    /// The filter is a cheap in-memory scan, so it resolves on the calling
    /// thread.
    fn fetch(&self, window: GeoWindow, completion: FetchCompletion) {
        completion.resolve(self.query(&window));
    }
}
