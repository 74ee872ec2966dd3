//! Error types for engine requests
//!
//! Every failure of a remote call is normalized into [`EngineError`] at the
//! client boundary, so callers can tell "server down" apart from "server
//! returned garbage" without inspecting transport details.

use thiserror::Error;

/// Errors that can occur when talking to the engine
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The engine could not be reached (connection refused, timeout, DNS)
    #[error("engine unreachable at {url}: {reason}")]
    Unreachable {
        /// Address that was being contacted
        url: String,
        /// Transport-level reason
        reason: String,
    },

    /// The engine answered with a non-2xx status
    #[error("engine returned {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// `output` field of the body, or the status text when absent
        message: String,
    },

    /// The engine refused the supplied credentials
    #[error("{0}")]
    Rejected(String),

    /// The body was not JSON or did not have the expected shape
    #[error("invalid server response: {0}")]
    InvalidResponse(String),

    /// The configured base URL cannot be used to build request URLs
    #[error("invalid engine url '{0}'")]
    InvalidUrl(String),
}

impl EngineError {
    /// Whether this error came from a malformed payload
    pub fn is_protocol(&self) -> bool {
        matches!(self, EngineError::InvalidResponse(_))
    }

    /// Whether this error came from the transport (unreachable or non-2xx)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            EngineError::Unreachable { .. } | EngineError::Status { .. } | EngineError::InvalidUrl(_)
        )
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
