//! Clients for the two collaborating services: the document parse service
//! and the storage backend. Both sit behind trait seams so the workflow and
//! its tests never depend on a live endpoint.

pub mod parse;
pub mod store;

use std::time::Duration;

use thiserror::Error;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure of an outbound service call. `Rejected` is the service's explicit
/// `success: false` envelope; `Transport` is everything that kept a response
/// from arriving or decoding. Both are recoverable at the workflow level.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    #[error("service rejected the request: {reason}")]
    Rejected { reason: String },

    #[error("transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Transport(err.to_string())
    }
}

pub(crate) fn build_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .expect("Failed to build HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_error_carries_reason() {
        let err = ServiceError::Rejected {
            reason: "No file part".to_string(),
        };
        assert_eq!(err.to_string(), "service rejected the request: No file part");
    }
}
