//! Error types for site fetching.

use thiserror::Error;

/// Errors surfaced by site fetch services.
///
/// Failures never mutate the window or the cache; the coordinator surfaces
/// them and stays ready for the next trigger, so a later pan or a manual
/// refetch can retry the same region.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The fetch failed at the transport level (network, timeout, non-2xx).
    #[error("transport error: {reason}")]
    Transport {
        /// Description of the underlying failure.
        reason: String,
    },

    /// The response arrived but could not be parsed into site records.
    #[error("malformed response: {reason}")]
    MalformedResponse {
        /// Which part of the payload was missing or invalid.
        reason: String,
    },

    /// The offline site store lock was poisoned (a thread panicked while
    /// holding it).
    #[error("cached site store lock was poisoned")]
    CacheLockPoisoned,
}

impl FetchError {
    /// Build a transport error from any displayable cause.
    pub fn transport(cause: impl std::fmt::Display) -> Self {
        FetchError::Transport {
            reason: cause.to_string(),
        }
    }

    /// Build a malformed-response error from any displayable cause.
    pub fn malformed(cause: impl std::fmt::Display) -> Self {
        FetchError::MalformedResponse {
            reason: cause.to_string(),
        }
    }
}
