//! # Sync Store
//!
//! Owns the [`SyncConfig`] and drives every sync and backup action.
//!
//! ## Sync actions
//!
//! | Action     | Remote read | Local write         | Remote write          |
//! |------------|-------------|---------------------|-----------------------|
//! | `Upload`   | no          | no                  | local state           |
//! | `Download` | yes         | remote, no merge    | no                    |
//! | `Sync`     | yes         | remote merged local | merged (or local if remote empty) |
//!
//! Every action is skipped without touching the network when the active
//! provider has no credentials. The last sync time is recorded only when an
//! action runs to completion (`Uploaded`, `Downloaded`, `Merged`).
//!
//! ## Usage
//!
//! ```ignore
//! use core_sync::{SyncAction, SyncStore};
//!
//! let store = SyncStore::load(deps).await?;
//! store.update_config(|c| c.webdav.username = "alice".into()).await?;
//! let outcome = store.sync(SyncAction::Sync).await?;
//! ```

use crate::client::SyncClientFactory;
use crate::config::SyncConfig;
use crate::merge::AppStateMerger;
use crate::repository::SyncConfigRepository;
use crate::state::{AppState, AppStateStore};
use crate::{Result, SyncError};
use bridge_traits::host::{AppLifecycle, Notifier};
use bridge_traits::storage::{FileExchange, SyncClient};
use bridge_traits::time::Clock;
use chrono::{DateTime, Local, TimeZone};
use core_runtime::events::{BackupEvent, CoreEvent, EventBus, SyncEvent};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Which way state flows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Merge remote into local, then push the result
    Sync,
    /// Overwrite remote with local
    Upload,
    /// Overwrite local with remote
    Download,
}

impl SyncAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncAction::Sync => "sync",
            SyncAction::Upload => "upload",
            SyncAction::Download => "download",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a sync action ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// No credentials for the active provider; nothing happened
    Skipped,
    /// Local state was written to the remote
    Uploaded,
    /// Remote was empty during `Sync`; local state was pushed as-is
    Bootstrapped,
    /// Remote was merged into local and the result pushed back
    Merged,
    /// Remote was empty during `Download`; local state untouched
    RemoteEmpty,
    /// Local state was replaced by the remote snapshot
    Downloaded,
}

impl SyncOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncOutcome::Skipped => "skipped",
            SyncOutcome::Uploaded => "uploaded",
            SyncOutcome::Bootstrapped => "bootstrapped",
            SyncOutcome::Merged => "merged",
            SyncOutcome::RemoteEmpty => "remote_empty",
            SyncOutcome::Downloaded => "downloaded",
        }
    }

    /// The action ran to completion and counts as a sync.
    pub fn records_sync_time(&self) -> bool {
        matches!(
            self,
            SyncOutcome::Uploaded | SyncOutcome::Downloaded | SyncOutcome::Merged
        )
    }
}

/// Result of [`SyncStore::import`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    /// No file was picked
    Cancelled,
    /// File merged into local state and the app reloaded
    Imported,
    /// File could not be applied; the user was notified
    Failed,
}

/// User-facing strings
#[derive(Debug, Clone)]
pub struct SyncMessages {
    pub import_failed: String,
}

/// Collaborators of a [`SyncStore`]
pub struct SyncStoreDeps {
    pub repository: SyncConfigRepository,
    pub app_state: Arc<dyn AppStateStore>,
    pub merger: Arc<dyn AppStateMerger>,
    pub clients: Arc<dyn SyncClientFactory>,
    pub files: Arc<dyn FileExchange>,
    pub notifier: Arc<dyn Notifier>,
    pub lifecycle: Arc<dyn AppLifecycle>,
    pub clock: Arc<dyn Clock>,
    pub event_bus: EventBus,
    pub messages: SyncMessages,
}

/// Name of an exported backup file, e.g. `Backup-2024_03_09 14_05_00.json`.
pub fn backup_file_name<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format!("Backup-{}.json", at.format("%Y_%m_%d %H_%M_%S"))
}

pub struct SyncStore {
    config: RwLock<SyncConfig>,
    repository: SyncConfigRepository,
    app_state: Arc<dyn AppStateStore>,
    merger: Arc<dyn AppStateMerger>,
    clients: Arc<dyn SyncClientFactory>,
    files: Arc<dyn FileExchange>,
    notifier: Arc<dyn Notifier>,
    lifecycle: Arc<dyn AppLifecycle>,
    clock: Arc<dyn Clock>,
    event_bus: EventBus,
    messages: SyncMessages,
}

impl SyncStore {
    /// Load (and migrate) the persisted config and build the store.
    pub async fn load(deps: SyncStoreDeps) -> Result<Self> {
        let config = deps.repository.load().await?;
        info!(provider = %config.provider, cloud_sync = config.cloud_sync(), "Sync store loaded");

        Ok(Self {
            config: RwLock::new(config),
            repository: deps.repository,
            app_state: deps.app_state,
            merger: deps.merger,
            clients: deps.clients,
            files: deps.files,
            notifier: deps.notifier,
            lifecycle: deps.lifecycle,
            clock: deps.clock,
            event_bus: deps.event_bus,
            messages: deps.messages,
        })
    }

    /// Snapshot of the current config.
    pub async fn config(&self) -> SyncConfig {
        self.config.read().await.clone()
    }

    /// Mutate the config and persist it.
    ///
    /// The in-memory config only changes if persisting succeeds.
    pub async fn update_config<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut SyncConfig),
    {
        let mut guard = self.config.write().await;
        let mut updated = guard.clone();
        mutate(&mut updated);
        self.repository.save(&updated).await?;
        *guard = updated;
        Ok(())
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub async fn cloud_sync(&self) -> bool {
        self.config.read().await.cloud_sync()
    }

    pub async fn has_account(&self) -> bool {
        self.config.read().await.has_account()
    }

    /// Record now as the last sync time for the active provider.
    ///
    /// A failure to persist is logged; the in-memory config is updated
    /// regardless.
    pub async fn mark_sync_time(&self) {
        let now = self.clock.unix_timestamp_millis();
        let mut guard = self.config.write().await;
        guard.last_sync_time = now;
        guard.last_provider = guard.provider.as_str().to_string();

        if let Err(e) = self.repository.save(&guard).await {
            warn!(error = %e, "Failed to persist last sync time");
        }
    }

    /// A fresh client for the active provider.
    pub async fn get_client(&self) -> Result<Arc<dyn SyncClient>> {
        let config = self.config().await;
        self.clients.create(&config)
    }

    /// Probe the active provider with the current credentials.
    #[instrument(skip(self))]
    pub async fn check(&self) -> Result<bool> {
        let client = self.get_client().await?;
        client.check().await.map_err(SyncError::Remote)
    }

    pub async fn upload(&self) -> Result<SyncOutcome> {
        self.sync(SyncAction::Upload).await
    }

    pub async fn download(&self) -> Result<SyncOutcome> {
        self.sync(SyncAction::Download).await
    }

    /// Run a sync action against the active provider.
    ///
    /// # Errors
    ///
    /// Remote, parse, merge and local-state failures are returned unchanged.
    /// Local state is only written once the remote document has been parsed
    /// (and merged, for `Sync`).
    #[instrument(skip(self))]
    pub async fn sync(&self, action: SyncAction) -> Result<SyncOutcome> {
        let config = self.config().await;
        if !config.has_account() {
            info!(provider = %config.provider, "No account configured, skipping sync");
            return Ok(SyncOutcome::Skipped);
        }

        let client = self.clients.create(&config)?;
        let key = config.sync_key();
        let run_id = Uuid::new_v4().to_string();
        let started = Instant::now();

        self.event_bus
            .emit(CoreEvent::Sync(SyncEvent::Started {
                run_id: run_id.clone(),
                action: action.as_str().to_string(),
                provider: config.provider.as_str().to_string(),
            }))
            .ok();

        let result = match action {
            SyncAction::Upload => self.run_upload(client.as_ref(), key).await,
            SyncAction::Download => self.run_download(client.as_ref(), key).await,
            SyncAction::Sync => self.run_sync(client.as_ref(), key).await,
        };

        match &result {
            Ok(outcome) => {
                if outcome.records_sync_time() {
                    self.mark_sync_time().await;
                }
                info!(outcome = outcome.as_str(), "Sync finished");
                self.event_bus
                    .emit(CoreEvent::Sync(SyncEvent::Completed {
                        run_id,
                        action: action.as_str().to_string(),
                        outcome: outcome.as_str().to_string(),
                        duration_ms: started.elapsed().as_millis() as u64,
                    }))
                    .ok();
            }
            Err(e) => {
                self.event_bus
                    .emit(CoreEvent::Sync(SyncEvent::Failed {
                        run_id,
                        action: action.as_str().to_string(),
                        message: e.to_string(),
                    }))
                    .ok();
            }
        }

        result
    }

    async fn fetch_remote(&self, client: &dyn SyncClient, key: &str) -> Result<Option<AppState>> {
        let raw = client.get(key).await.map_err(SyncError::Remote)?;
        let Some(raw) = raw.filter(|raw| !raw.is_empty()) else {
            return Ok(None);
        };

        let remote = AppState::from_json(&raw)?;
        if !remote.is_document() {
            return Err(SyncError::Parse(serde::de::Error::custom(
                "remote state is not a JSON object",
            )));
        }
        Ok(Some(remote))
    }

    async fn push(&self, client: &dyn SyncClient, key: &str, state: &AppState) -> Result<()> {
        let raw = state.to_json()?;
        client.set(key, &raw).await.map_err(SyncError::Remote)?;
        debug!(bytes = raw.len(), "Pushed state to remote");
        Ok(())
    }

    async fn run_upload(&self, client: &dyn SyncClient, key: &str) -> Result<SyncOutcome> {
        let local = self.app_state.load().await?;
        self.push(client, key, &local).await?;
        Ok(SyncOutcome::Uploaded)
    }

    async fn run_download(&self, client: &dyn SyncClient, key: &str) -> Result<SyncOutcome> {
        let Some(remote) = self.fetch_remote(client, key).await? else {
            info!("Remote state is empty, keeping local state");
            return Ok(SyncOutcome::RemoteEmpty);
        };

        self.app_state.store(&remote).await?;
        Ok(SyncOutcome::Downloaded)
    }

    async fn run_sync(&self, client: &dyn SyncClient, key: &str) -> Result<SyncOutcome> {
        let merged = match self.reconcile(client, key).await {
            Ok(Some(merged)) => merged,
            Ok(None) => return Ok(SyncOutcome::Bootstrapped),
            Err(e) => {
                error!(error = %e, "Failed to get remote state");
                return Err(e);
            }
        };

        self.push(client, key, &merged).await?;
        Ok(SyncOutcome::Merged)
    }

    /// Merge the remote document into local state and persist it.
    ///
    /// Returns `None` after seeding an empty remote with local state.
    async fn reconcile(&self, client: &dyn SyncClient, key: &str) -> Result<Option<AppState>> {
        let mut local = self.app_state.load().await?;

        let Some(remote) = self.fetch_remote(client, key).await? else {
            self.push(client, key, &local).await?;
            info!("Remote state is empty, using local state instead");
            return Ok(None);
        };

        self.merger.merge(&mut local, &remote)?;
        self.app_state.store(&local).await?;
        Ok(Some(local))
    }

    /// Write the current state to a backup file.
    #[instrument(skip(self))]
    pub async fn export(&self) -> Result<()> {
        let state = self.app_state.load().await?;
        let content = state.to_json()?;
        let file_name = backup_file_name(&self.clock.now().with_timezone(&Local));

        self.files.download_as(&content, &file_name).await?;
        info!(file = %file_name, "Exported backup");

        self.event_bus
            .emit(CoreEvent::Backup(BackupEvent::Exported {
                file_name,
                bytes: content.len() as u64,
            }))
            .ok();
        Ok(())
    }

    /// Merge a user-picked backup file into local state and reload the app.
    ///
    /// A file that cannot be parsed or merged leaves local state untouched,
    /// shows the import-failed toast and yields `ImportOutcome::Failed`.
    ///
    /// # Errors
    ///
    /// Failing to read the picked file or to reload the app.
    #[instrument(skip(self))]
    pub async fn import(&self) -> Result<ImportOutcome> {
        let Some(raw) = self.files.read_from_file().await? else {
            debug!("No backup file picked");
            return Ok(ImportOutcome::Cancelled);
        };

        if let Err(e) = self.apply_import(&raw).await {
            error!(error = %e, "Failed to import backup");
            self.notifier.show_toast(&self.messages.import_failed);
            self.event_bus
                .emit(CoreEvent::Backup(BackupEvent::ImportFailed {
                    message: e.to_string(),
                }))
                .ok();
            return Ok(ImportOutcome::Failed);
        }

        self.event_bus
            .emit(CoreEvent::Backup(BackupEvent::Imported {
                bytes: raw.len() as u64,
            }))
            .ok();
        self.lifecycle.reload().await?;
        Ok(ImportOutcome::Imported)
    }

    async fn apply_import(&self, raw: &str) -> Result<()> {
        let imported = AppState::from_json(raw)?;
        let mut local = self.app_state.load().await?;
        self.merger.merge(&mut local, &imported)?;
        self.app_state.store(&local).await
    }
}
