//! Gateway error types

use std::time::Duration;

/// Gateway result type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by gateway calls
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned {code}: {message}")]
    Status { code: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Call timed out after {0:?}")]
    Timeout(Duration),

    #[error("Gateway not configured: {0}")]
    Unconfigured(&'static str),

    #[error("Empty response from service")]
    EmptyResponse,
}
