//! Error types for fathom-client.

use thiserror::Error;

/// Main error type for all Fathom client operations.
#[derive(Debug, Error)]
pub enum FathomError {
    /// RPC attempted while the session is not connected.
    #[error("not connected")]
    NotConnected,

    /// The connection could not be established, or `connect` was called
    /// on a session that already left the `Connecting` state.
    #[error("connection error: {0}")]
    Connection(String),

    /// Channel-level failure while sending or receiving a frame.
    #[error("transport error: {0}")]
    Transport(String),

    /// Server-reported error on a query or protocol operation.
    #[error("{message}")]
    Protocol { code: i64, message: String },

    /// Server rejected an authentication operation.
    #[error("{message}")]
    Authentication { code: i64, message: String },

    /// Server denied a data operation.
    #[error("{message}")]
    Permission { code: i64, message: String },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The business operation a call was made on behalf of.
///
/// The server error envelope carries only a code and a message; which
/// [`FathomError`] variant it becomes is decided by the initiating method,
/// passed down as one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorContext {
    /// Queries, reads, and session management.
    Query,
    /// Credential and token operations.
    Authentication,
    /// Record-level mutations and parameter assignment.
    Permission,
}

impl ErrorContext {
    pub(crate) fn classify(self, code: i64, message: String) -> FathomError {
        match self {
            ErrorContext::Query => FathomError::Protocol { code, message },
            ErrorContext::Authentication => FathomError::Authentication { code, message },
            ErrorContext::Permission => FathomError::Permission { code, message },
        }
    }
}

/// Result type alias using FathomError.
pub type Result<T> = std::result::Result<T, FathomError>;
