//! # Core Sync Module
//!
//! Mirrors the application's state to a user-configured remote and back.
//!
//! ## Overview
//!
//! - [`config`]: the persisted [`SyncConfig`] and its provider sub-configs
//! - [`migration`]: versioned upgrades of stored configs
//! - [`repository`]: config persistence in the host `SettingsStore`
//! - [`state`]: the opaque application state and where it lives
//! - [`merge`]: folding remote state into local state
//! - [`client`]: building the remote client for the active provider
//! - [`store`]: the [`SyncStore`] controller (sync, upload, download,
//!   export, import, check)

pub mod client;
pub mod config;
pub mod error;
pub mod merge;
pub mod migration;
pub mod repository;
pub mod state;
pub mod store;

pub use client::{create_sync_client, HttpSyncClientFactory, SyncClientFactory};
pub use config::{
    ActiveProvider, ProviderType, SyncConfig, UpstashConfig, WebDavConfig, STORAGE_KEY,
};
pub use error::{Result, SyncError};
pub use merge::{AppStateMerger, LastUpdateWinsMerger};
pub use migration::{migrate, MigrationStep, CURRENT_VERSION, MIGRATIONS};
pub use repository::SyncConfigRepository;
pub use state::{AppState, AppStateStore, SettingsAppStateStore};
pub use store::{
    backup_file_name, ImportOutcome, SyncAction, SyncMessages, SyncOutcome, SyncStore,
    SyncStoreDeps,
};
