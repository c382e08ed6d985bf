//! Error types for the Upstash provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Upstash provider errors
#[derive(Error, Debug)]
pub enum UpstashError {
    /// REST API rejected the token
    #[error("Upstash authentication failed (status {status_code})")]
    AuthenticationFailed { status_code: u16 },

    /// API error response
    #[error("Upstash API error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Chunk announced by the count key is absent
    #[error("Upstash value is incomplete: chunk {index} of {count} is missing")]
    MissingChunk { index: usize, count: usize },

    /// Response body did not match the REST envelope
    #[error("Failed to parse Upstash response: {0}")]
    ParseError(String),

    /// Bridge error
    #[error(transparent)]
    BridgeError(#[from] BridgeError),
}

/// Result type for Upstash operations
pub type Result<T> = std::result::Result<T, UpstashError>;

impl UpstashError {
    pub(crate) fn from_status(status_code: u16, body: &[u8]) -> Self {
        match status_code {
            401 | 403 => UpstashError::AuthenticationFailed { status_code },
            _ => UpstashError::ApiError {
                status_code,
                message: String::from_utf8_lossy(body).into_owned(),
            },
        }
    }
}

impl From<UpstashError> for BridgeError {
    fn from(error: UpstashError) -> Self {
        match error {
            UpstashError::AuthenticationFailed { status_code } => BridgeError::Http {
                status: status_code,
                message: "Upstash authentication failed".to_string(),
            },
            UpstashError::ApiError {
                status_code,
                message,
            } => BridgeError::Http {
                status: status_code,
                message,
            },
            UpstashError::BridgeError(e) => e,
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}
