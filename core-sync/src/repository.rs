//! # Sync Config Repository
//!
//! Persists [`SyncConfig`] in the host `SettingsStore` as a versioned
//! envelope:
//!
//! ```json
//! { "state": { "provider": "webdav", ... }, "version": 1.2 }
//! ```
//!
//! Loading runs pending migrations and writes the upgraded record back.

use crate::config::SyncConfig;
use crate::migration::{migrate, CURRENT_VERSION};
use crate::{Result, SyncError};
use bridge_traits::storage::SettingsStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Settings key holding the sync config envelope.
pub const SYNC_CONFIG_KEY: &str = "sync";

#[derive(Serialize, Deserialize)]
struct Envelope {
    state: SyncConfig,
    /// Absent in records written before versioning
    #[serde(default)]
    version: f64,
}

pub struct SyncConfigRepository {
    settings: Arc<dyn SettingsStore>,
}

impl SyncConfigRepository {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self { settings }
    }

    /// Load the stored config, migrating it to the current version.
    ///
    /// # Errors
    ///
    /// - `SyncError::Config` if the stored record is not a valid envelope
    /// - `SyncError::Bridge` if the settings store fails
    pub async fn load(&self) -> Result<SyncConfig> {
        let Some(raw) = self.settings.get_string(SYNC_CONFIG_KEY).await? else {
            debug!("No stored sync config, using defaults");
            return Ok(SyncConfig::default());
        };

        let Envelope { mut state, version } = serde_json::from_str(&raw)
            .map_err(|e| SyncError::Config(format!("Stored sync config is corrupt: {}", e)))?;

        if version < CURRENT_VERSION {
            let applied = migrate(&mut state, version);
            info!(from = version, to = CURRENT_VERSION, applied, "Migrated sync config");
            self.save(&state).await?;
        }

        Ok(state)
    }

    /// Persist `config` at the current version.
    pub async fn save(&self, config: &SyncConfig) -> Result<()> {
        let envelope = Envelope {
            state: config.clone(),
            version: CURRENT_VERSION,
        };
        let raw = serde_json::to_string(&envelope)?;
        self.settings.set_string(SYNC_CONFIG_KEY, &raw).await?;
        Ok(())
    }
}
