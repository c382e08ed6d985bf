//! Desktop host shell: toasts and reload signalling

use async_trait::async_trait;
use bridge_traits::{
    error::Result,
    host::{AppLifecycle, Notifier},
};
use tokio::sync::watch;
use tracing::info;

/// Notifier that routes toasts into the tracing pipeline.
///
/// Desktop shells without a toast widget surface these through their log
/// view; the `toast` target makes them easy to filter.
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show_toast(&self, message: &str) {
        info!(target: "toast", message);
    }
}

/// Lifecycle that publishes reload requests on a watch channel.
///
/// The UI layer subscribes and rebuilds its in-memory state whenever the
/// generation counter changes.
pub struct DesktopLifecycle {
    generation: watch::Sender<u64>,
}

impl DesktopLifecycle {
    pub fn new() -> Self {
        let (generation, _) = watch::channel(0);
        Self { generation }
    }

    /// Subscribe to reload requests.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }

    /// Number of reloads requested so far.
    pub fn reload_count(&self) -> u64 {
        *self.generation.borrow()
    }
}

impl Default for DesktopLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AppLifecycle for DesktopLifecycle {
    async fn reload(&self) -> Result<()> {
        self.generation.send_modify(|g| *g += 1);
        info!(generation = self.reload_count(), "Application reload requested");
        Ok(())
    }
}
