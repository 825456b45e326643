//! Collaborator errors.

use thiserror::Error;

/// Errors raised by external collaborators.
///
/// None of these are fatal to the board; callers turn them into notices.
#[derive(Debug, Error)]
pub enum AssistError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Timeout after {0}s")]
    Timeout(u64),

    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not supported: {0}")]
    Unsupported(String),
}

/// Result type for collaborator calls.
pub type AssistResult<T> = Result<T, AssistError>;
