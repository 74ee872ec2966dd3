//! Client-side error kinds
//!
//! Remote failures arrive as [`EngineError`] and are folded into
//! [`ClientError`] so every caller deals with one discriminated result.

use engine_client::EngineError;
use thiserror::Error;

/// Problems detected locally, before anything is sent to the engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no commands provided")]
    EmptyInput,

    #[error(
        "command '{command}' (line {line}) requires an active session; \
         commands allowed without login: {allowed}"
    )]
    RequiresSession {
        command: String,
        line: usize,
        allowed: String,
    },

    #[error("all fields are required")]
    MissingCredentials,

    #[error("partition id is required")]
    MissingPartitionId,

    #[error("not logged in")]
    NotAuthenticated,

    #[error("no disk selected")]
    NoDiskSelected,

    #[error("no partition selected")]
    NoPartitionSelected,

    #[error("no disk matches '{0}'")]
    UnknownDisk(String),

    #[error("no partition matches '{0}'")]
    UnknownPartition(String),

    #[error("'{0}' is not a folder in the current directory")]
    UnknownFolder(String),
}

/// Discriminated failure of any client operation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Rejected locally; nothing was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The engine refused the credentials (message is the engine's own)
    #[error("{0}")]
    Authentication(String),

    /// Engine unreachable or answered with a failure status
    #[error("request failed: {0}")]
    Transport(String),

    /// Engine answered with something that is not the agreed shape
    #[error("invalid server response: {0}")]
    Protocol(String),
}

impl ClientError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, ClientError::Authentication(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport(_))
    }

    pub fn is_protocol(&self) -> bool {
        matches!(self, ClientError::Protocol(_))
    }
}

impl From<EngineError> for ClientError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Rejected(message) => ClientError::Authentication(message),
            EngineError::InvalidResponse(detail) => ClientError::Protocol(detail),
            EngineError::Status { message, .. } => ClientError::Transport(message),
            other @ (EngineError::Unreachable { .. } | EngineError::InvalidUrl(_)) => {
                ClientError::Transport(other.to_string())
            }
        }
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
