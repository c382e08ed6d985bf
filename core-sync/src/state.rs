//! # Local Application State
//!
//! The application state mirrored to the remote is an opaque JSON document.
//! The sync core never looks inside it except through an
//! [`AppStateMerger`](crate::merge::AppStateMerger).

use crate::{Result, SyncError};
use async_trait::async_trait;
use bridge_traits::storage::SettingsStore;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Full application state snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppState(Value);

impl AppState {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// An empty state document (`{}`).
    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Top-level value is a JSON object.
    pub fn is_document(&self) -> bool {
        self.0.is_object()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for AppState {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Read/write access to the live application state.
#[async_trait]
pub trait AppStateStore: Send + Sync {
    /// Snapshot the current state.
    async fn load(&self) -> Result<AppState>;

    /// Replace the current state wholesale.
    async fn store(&self, state: &AppState) -> Result<()>;
}

/// Settings key holding the application state document.
pub const APP_STATE_KEY: &str = "app-state";

/// [`AppStateStore`] that keeps the document as one JSON string in the
/// host `SettingsStore`.
pub struct SettingsAppStateStore {
    settings: Arc<dyn SettingsStore>,
}

impl SettingsAppStateStore {
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl AppStateStore for SettingsAppStateStore {
    async fn load(&self) -> Result<AppState> {
        match self.settings.get_string(APP_STATE_KEY).await? {
            Some(raw) => AppState::from_json(&raw)
                .map_err(|e| SyncError::State(format!("Stored app state is corrupt: {}", e))),
            None => Ok(AppState::empty()),
        }
    }

    async fn store(&self, state: &AppState) -> Result<()> {
        let raw = state.to_json()?;
        self.settings.set_string(APP_STATE_KEY, &raw).await?;
        Ok(())
    }
}
