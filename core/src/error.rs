//! Error type for the coreapi client.
//!
//! # Design
//! Only failures with no usable API response become `Err`: transport
//! problems where no status code ever arrived, and 200 responses whose
//! body is not JSON. Input-validation failures and non-200 statuses
//! are returned as ordinary `{"status": "error", ...}` values instead,
//! the same shape the remote service uses for its own errors.

use std::fmt;

/// Errors returned by `CoreapiClient` methods.
#[derive(Debug)]
pub enum ApiError {
    /// The request never produced an HTTP status: connection failure,
    /// timeout, DNS error.
    Transport(String),

    /// The server answered 200 but the body was not valid JSON.
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(msg) => write!(f, "transport error: {msg}"),
            ApiError::Decode(msg) => write!(f, "response is not valid JSON: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}
