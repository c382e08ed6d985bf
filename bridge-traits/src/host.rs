//! Host UI Integration
//!
//! Fire-and-forget notifications and application reload, both owned by the
//! host shell rather than the core.

use async_trait::async_trait;

use crate::error::Result;

/// Short user-visible notification (toast, snackbar, status line).
///
/// Delivery is best effort; the core never waits on or inspects the result.
pub trait Notifier: Send + Sync {
    fn show_toast(&self, message: &str);
}

/// Controls the host application's lifecycle.
#[async_trait]
pub trait AppLifecycle: Send + Sync {
    /// Discard in-memory state and restart from persisted state.
    ///
    /// Called after an import rewrote the persisted application state.
    async fn reload(&self) -> Result<()>;
}
