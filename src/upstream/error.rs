use thiserror::Error;

/// Failures surfaced by the upstream boundary and the cache built on top of it.
///
/// "Not found" is not an error: single-record fetches report it as `Ok(None)`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// Transport failure, timeout or server-side error from the remote source.
    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    /// The remote source answered with something we could not decode.
    #[error("Bad upstream response: {0}")]
    BadResponse(String),

    /// Malformed id or url supplied by the caller, rejected before any I/O.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl UpstreamError {
    /// Whether a caller may reasonably retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            UpstreamError::Unavailable(_) | UpstreamError::BadResponse(_)
        )
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_decode() {
            UpstreamError::BadResponse(err.to_string())
        } else {
            UpstreamError::Unavailable(err.to_string())
        }
    }
}
