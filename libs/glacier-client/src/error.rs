//! Glacier error types using thiserror 2.0.
//!
//! Failures are tagged by where they happened (network, service, body
//! decoding, signing, local validation) so callers of the `try_*` API can
//! tell them apart. The boolean API collapses all of them into `false`.

use thiserror::Error;

/// Glacier client errors.
#[derive(Error, Debug)]
pub enum GlacierError {
    /// Request never produced an HTTP response
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Transport failure reported by a non-reqwest transport
    #[error("Transport error: {0}")]
    TransportMessage(String),

    /// Service answered with a non-2xx status
    #[error("Service error {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Service {
        /// HTTP status code
        status: u16,
        /// Error code from the service's error document, e.g. `ResourceNotFoundException`
        code: Option<String>,
        /// Human readable message from the service's error document
        message: Option<String>,
        /// Raw response body
        body: String,
    },

    /// 2xx response whose body is not a JSON object
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Request could not be signed
    #[error("Signing error: {0}")]
    Signing(String),

    /// Caller supplied an invalid vault name or list limit
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for Glacier operations.
pub type GlacierResult<T> = Result<T, GlacierError>;

impl GlacierError {
    /// HTTP status of a service error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Check if the service reported a missing resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Service { status: 404, .. })
    }

    /// Create a transport error from a message.
    #[must_use]
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::TransportMessage(msg.into())
    }

    /// Create a signing error.
    #[must_use]
    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
