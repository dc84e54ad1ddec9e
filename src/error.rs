// Error types for panorama.
// Every failure a page can surface (transport, HTTP status, bad payloads, validation) lands here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PanoramaError {
    #[error("Network request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("Failed to parse response JSON")]
    MalformedBody(#[source] serde_json::Error),

    #[error("Unexpected response shape: {0}")]
    Schema(String),

    /// Application-level error reported by an upstream API inside a 2xx response.
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PanoramaError {
    /// Build a validation error from any message.
    pub fn validation(message: impl Into<String>) -> Self {
        PanoramaError::Validation(message.into())
    }

    /// HTTP status code carried by this error, if it came from a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            PanoramaError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PanoramaError>;
