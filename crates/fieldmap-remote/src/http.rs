//! HTTP client for the remote sites database.

use crate::payload::{parse_sites_payload, window_query_body};
use fieldmap_core::{FetchCompletion, FetchError, SiteFetchService, SiteRecord};
use fieldmap_geo::GeoWindow;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Public sites-for-mobile endpoint of the wateriso database.
pub const DEFAULT_ENDPOINT: &str = "http://wateriso.utah.edu/api/sites_for_mobile.php";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches sites from the remote database over HTTP.
///
/// Each fetch runs on its own worker thread with a blocking client, so the
/// caller never waits on the network. The coordinator's token discard
/// handles overlapping requests; no transport-level cancellation is
/// attempted.
#[derive(Debug, Clone)]
pub struct HttpSiteService {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpSiteService {
    /// Create a service against `endpoint` with the default timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Create a service with an explicit request timeout.
    ///
    /// A request that exceeds the timeout resolves as a transport error;
    /// the coordinator keeps its window so the region can be retried.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::transport)?;
        Ok(HttpSiteService {
            client,
            endpoint: endpoint.into(),
        })
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn fetch_blocking(&self, window: GeoWindow) -> Result<Vec<SiteRecord>, FetchError> {
        let body = window_query_body(&window);
        debug!(
            "requesting sites for ({:.4}, {:.4})..({:.4}, {:.4})",
            window.min.latitude, window.min.longitude, window.max.latitude, window.max.longitude
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .map_err(FetchError::transport)?
            .error_for_status()
            .map_err(FetchError::transport)?;

        let text = response.text().map_err(FetchError::transport)?;
        let sites = parse_sites_payload(&text)?;
        debug!("received {} site(s)", sites.len());
        Ok(sites)
    }
}

impl SiteFetchService for HttpSiteService {
    fn fetch(&self, window: GeoWindow, completion: FetchCompletion) {
        let service = self.clone();
        thread::spawn(move || {
            completion.resolve(service.fetch_blocking(window));
        });
    }
}
