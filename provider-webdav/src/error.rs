//! Error types for the WebDAV provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// WebDAV provider errors
#[derive(Error, Debug)]
pub enum WebDavError {
    /// Server rejected the credentials
    #[error("WebDAV authentication failed (status {status_code})")]
    AuthenticationFailed { status_code: u16 },

    /// Server answered with an unexpected status
    #[error("WebDAV server error (status {status_code}): {message}")]
    ApiError { status_code: u16, message: String },

    /// Connector configuration is unusable
    #[error("Invalid WebDAV configuration: {0}")]
    InvalidConfig(String),

    /// Bridge error
    #[error(transparent)]
    BridgeError(#[from] BridgeError),
}

/// Result type for WebDAV operations
pub type Result<T> = std::result::Result<T, WebDavError>;

impl WebDavError {
    pub(crate) fn from_status(status_code: u16, body: &[u8]) -> Self {
        match status_code {
            401 | 403 => WebDavError::AuthenticationFailed { status_code },
            _ => WebDavError::ApiError {
                status_code,
                message: String::from_utf8_lossy(body).into_owned(),
            },
        }
    }
}

impl From<WebDavError> for BridgeError {
    fn from(error: WebDavError) -> Self {
        match error {
            WebDavError::AuthenticationFailed { status_code } => BridgeError::Http {
                status: status_code,
                message: "WebDAV authentication failed".to_string(),
            },
            WebDavError::ApiError {
                status_code,
                message,
            } => BridgeError::Http {
                status: status_code,
                message,
            },
            WebDavError::InvalidConfig(msg) => {
                BridgeError::OperationFailed(format!("Invalid WebDAV configuration: {}", msg))
            }
            WebDavError::BridgeError(e) => e,
        }
    }
}
