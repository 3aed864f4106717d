// src/error.rs

use std::fmt;

/// Global Application Error Enum.
/// Centralizes error handling for every operation the crate exposes.
#[derive(Debug)]
pub enum AppError {
    // Remote document-store request failed (read or write).
    Remote(String),

    // AI request failed or returned an unusable payload.
    Ai(String),

    // Invalid input (validation failure, malformed payload).
    BadRequest(String),

    // Authentication failure (bad credentials, admin key rejected).
    AuthError(String),

    // Referenced record does not exist.
    NotFound(String),

    // State conflict (e.g., duplicate name, already answered).
    Conflict(String),

    // Local device-storage failure.
    Storage(String),

    // Anything else that should never happen in normal operation.
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Remote(msg) => write!(f, "remote store error: {}", msg),
            AppError::Ai(msg) => write!(f, "ai error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            AppError::AuthError(msg) => write!(f, "auth error: {}", msg),
            AppError::NotFound(msg) => write!(f, "not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "conflict: {}", msg),
            AppError::Storage(msg) => write!(f, "storage error: {}", msg),
            AppError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `reqwest::Error` into `AppError::Remote`.
/// Allows using the `?` operator on document-store requests.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Remote(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}
