use bridge_traits::error::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    /// The remote endpoint failed or rejected the request
    #[error("Remote error: {0}")]
    Remote(#[source] BridgeError),

    #[error("Invalid state document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Merge failed: {0}")]
    Merge(String),

    /// Local application state could not be read or written
    #[error("Local state error: {0}")]
    State(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other host bridge failure (settings, files, lifecycle)
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}

pub type Result<T> = std::result::Result<T, SyncError>;
