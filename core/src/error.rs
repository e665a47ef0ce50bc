//! Error types for the bypass fetch.
//!
//! # Design
//! Every failure surfaces directly to the caller. Nothing here is retried and
//! nothing falls back: a JSON-declared body that fails to parse is a
//! `Decode` error, never a text result. HTTP status codes are not errors; a
//! 404 resolves like any other response.

use thiserror::Error;

/// Errors returned by `BypassClient::fetch` and `fetch_bypassing`.
#[derive(Debug, Error)]
pub enum BypassError {
    /// A structured request body could not be encoded as JSON. Raised before
    /// any network call is made.
    #[error("serialization failed: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The underlying transport failed to complete the request.
    #[error("transport failed: {0}")]
    Transport(String),

    /// The response body could not be decoded into the declared type.
    #[error("decoding failed: {0}")]
    Decode(#[source] serde_json::Error),
}

impl BypassError {
    pub(crate) fn transport(err: impl std::fmt::Display) -> Self {
        BypassError::Transport(err.to_string())
    }
}
