//! Error types for the Jenkins client.

use thiserror::Error;

/// Errors raised while talking to a Jenkins server.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ClientError {
    /// Raised when the server answers `401 Unauthorized`.
    #[error("unauthorized (HTTP 401) at {url}: check the username and password")]
    Unauthorized {
        /// URL that rejected the credentials.
        url: String,
    },
    /// Raised when an endpoint that must exist answers `404 Not Found`.
    #[error("not found (HTTP 404) at {url}")]
    NotFound {
        /// URL that was not found.
        url: String,
    },
    /// Raised when the request never produced a response.
    #[error("request to {url} failed: {message}")]
    Transport {
        /// URL being requested.
        url: String,
        /// Connection or protocol error message.
        message: String,
    },
    /// Raised when a call that requires success returns another status.
    #[error("{action} failed with HTTP {status} at {url}")]
    UnexpectedStatus {
        /// Operation that was attempted, for example `create item`.
        action: String,
        /// URL being requested.
        url: String,
        /// Status returned by the server.
        status: u16,
    },
    /// Raised when a response body does not have the expected shape.
    #[error("unexpected response from {url}: {message}")]
    Decode {
        /// URL whose response could not be decoded.
        url: String,
        /// Parser or validation message.
        message: String,
    },
}

impl ClientError {
    /// Returns `true` for [`ClientError::Unauthorized`].
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}
