//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (HTTP, settings,
//! file exchange, notifications, lifecycle) into the sync core. Desktop apps
//! typically enable the `desktop-shims` feature so [`CoreConfig`] can fill in
//! the bridges from `bridge-desktop`.
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use core_service::CoreService;
//! use core_sync::SyncAction;
//!
//! let config = CoreConfig::builder().data_dir("/tmp/chat").build().await?;
//! let core = CoreService::bootstrap(config).await?;
//! core.sync_store().sync(SyncAction::Sync).await?;
//! ```

pub mod error;

pub use error::{CoreError, Result};

use std::sync::Arc;

use core_runtime::config::CoreConfig;
use core_runtime::events::{EventBus, EventStream};
use core_sync::{
    HttpSyncClientFactory, LastUpdateWinsMerger, SettingsAppStateStore, SyncConfigRepository,
    SyncMessages, SyncStore, SyncStoreDeps,
};
use tracing::info;

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    config: Arc<CoreConfig>,
    sync: Arc<SyncStore>,
}

impl CoreService {
    /// Validate `config`, load the persisted sync config and build the
    /// sync store on top of the configured bridges.
    pub async fn bootstrap(config: CoreConfig) -> Result<Self> {
        config.validate()?;

        let settings = Arc::clone(&config.settings_store);
        let deps = SyncStoreDeps {
            repository: SyncConfigRepository::new(Arc::clone(&settings)),
            app_state: Arc::new(SettingsAppStateStore::new(settings)),
            merger: Arc::new(LastUpdateWinsMerger),
            clients: Arc::new(HttpSyncClientFactory::new(Arc::clone(&config.http_client))),
            files: Arc::clone(&config.file_exchange),
            notifier: Arc::clone(&config.notifier),
            lifecycle: Arc::clone(&config.lifecycle),
            clock: Arc::clone(&config.clock),
            event_bus: EventBus::new(config.event_buffer_size),
            messages: SyncMessages {
                import_failed: config.import_failed_message.clone(),
            },
        };

        let sync = SyncStore::load(deps).await?;
        info!(data_dir = %config.data_dir.display(), "Core service ready");

        Ok(Self {
            config: Arc::new(config),
            sync: Arc::new(sync),
        })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn sync_store(&self) -> Arc<SyncStore> {
        Arc::clone(&self.sync)
    }

    /// Stream of sync and backup events emitted from now on.
    pub fn subscribe_events(&self) -> EventStream {
        EventStream::new(self.sync.event_bus().subscribe())
    }
}
