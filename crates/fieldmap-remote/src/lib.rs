//! # fieldmap-remote
//!
//! Concrete [`SiteFetchService`](fieldmap_core::SiteFetchService)
//! implementations for the fieldmap core:
//!
//! - [`HttpSiteService`]: POSTs a bounding-window query to the remote
//!   sites database and validates the JSON payload field by field.
//! - [`CachedSiteStore`]: an in-memory store of previously fetched sites,
//!   answering window queries offline.
//! - [`FallbackSiteService`]: switches between the two based on an
//!   online/offline flag and tees remote results into the store so they
//!   remain available offline.
//!
//! Every field of the remote payload is treated as untrusted: required
//! fields that are missing or mistyped produce a
//! [`MalformedResponse`](fieldmap_core::FetchError::MalformedResponse)
//! error naming the field, never a panic.

mod fallback;
mod http;
mod payload;
mod store;

pub use fallback::FallbackSiteService;
pub use http::{HttpSiteService, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};
pub use payload::{parse_sites_payload, window_query_body};
pub use store::CachedSiteStore;
