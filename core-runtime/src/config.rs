//! # Core Configuration Module
//!
//! Provides configuration management for the sync core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! holding every host capability the sync core needs. It enforces fail-fast
//! validation so that missing bridges surface at startup, not on the first
//! sync.
//!
//! ## Capabilities
//!
//! - `HttpClient` - remote sync traffic (desktop default: reqwest)
//! - `SettingsStore` - sync config and local app state (desktop default: SQLite in `data_dir`)
//! - `FileExchange` - backup export/import (desktop default: downloads folder)
//! - `Notifier` - user-facing toasts (desktop default: tracing)
//! - `AppLifecycle` - reload after import (desktop default: watch channel)
//! - `Clock` - always defaults to the system clock
//!
//! When the `desktop-shims` feature is enabled, desktop-ready defaults are
//! injected for anything not provided. Without it, a missing capability is
//! reported as [`Error::CapabilityMissing`].
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .data_dir("/path/to/app-data")
//!     .http_client(Arc::new(MyHttpClient))
//!     .settings_store(Arc::new(MySettingsStore))
//!     .build()
//!     .await?;
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{
    AppLifecycle, Clock, FileExchange, HttpClient, Notifier, SettingsStore, SystemClock,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Toast shown when a backup file cannot be imported.
pub const DEFAULT_IMPORT_FAILED_MESSAGE: &str = "Failed to import from file";

/// Largest accepted event bus buffer.
const MAX_EVENT_BUFFER_SIZE: usize = 10_000;

/// Core configuration for the sync core.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Directory for on-disk state (settings database)
    pub data_dir: PathBuf,

    pub http_client: Arc<dyn HttpClient>,

    pub settings_store: Arc<dyn SettingsStore>,

    pub file_exchange: Arc<dyn FileExchange>,

    pub notifier: Arc<dyn Notifier>,

    pub lifecycle: Arc<dyn AppLifecycle>,

    pub clock: Arc<dyn Clock>,

    /// Capacity of the event bus channel
    pub event_buffer_size: usize,

    /// Localized toast text for a failed import
    pub import_failed_message: String,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("data_dir", &self.data_dir)
            .field("http_client", &"HttpClient { ... }")
            .field("settings_store", &"SettingsStore { ... }")
            .field("file_exchange", &"FileExchange { ... }")
            .field("notifier", &"Notifier { ... }")
            .field("lifecycle", &"AppLifecycle { ... }")
            .field("event_buffer_size", &self.event_buffer_size)
            .field("import_failed_message", &self.import_failed_message)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// This checks:
    /// - Data directory is not empty
    /// - Event buffer size is in `1..=10_000`
    /// - Import failure message is not blank
    pub fn validate(&self) -> Result<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(Error::Config("Data directory cannot be empty".to_string()));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.event_buffer_size > MAX_EVENT_BUFFER_SIZE {
            return Err(Error::Config(format!(
                "Event buffer size exceeds maximum of {}",
                MAX_EVENT_BUFFER_SIZE
            )));
        }

        if self.import_failed_message.trim().is_empty() {
            return Err(Error::Config(
                "Import failure message cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Path of the settings database inside `data_dir`.
    pub fn settings_path(&self) -> PathBuf {
        settings_path(&self.data_dir)
    }
}

fn settings_path(data_dir: &Path) -> PathBuf {
    data_dir.join("settings.db")
}

#[cfg(not(feature = "desktop-shims"))]
fn capability_missing(capability: &str, hint: &str) -> Error {
    Error::CapabilityMissing {
        capability: capability.to_string(),
        message: format!(
            "{} implementation is required. \
             Desktop: enable the 'desktop-shims' feature to use the default. \
             Other hosts: {}",
            capability, hint
        ),
    }
}

#[cfg(feature = "desktop-shims")]
mod defaults {
    use super::*;
    use bridge_desktop::{
        DesktopFileExchange, DesktopLifecycle, ReqwestHttpClient, SqliteSettingsStore,
        TracingNotifier,
    };

    pub(super) fn http_client() -> Result<Arc<dyn HttpClient>> {
        let client = ReqwestHttpClient::new()
            .map_err(|e| Error::Internal(format!("Failed to create default HttpClient: {}", e)))?;
        Ok(Arc::new(client))
    }

    pub(super) async fn settings_store(data_dir: &Path) -> Result<Arc<dyn SettingsStore>> {
        let store = SqliteSettingsStore::new(settings_path(data_dir))
            .await
            .map_err(|e| {
                Error::Internal(format!("Failed to initialize default SettingsStore: {}", e))
            })?;
        Ok(Arc::new(store))
    }

    pub(super) fn file_exchange() -> Result<Arc<dyn FileExchange>> {
        Ok(Arc::new(DesktopFileExchange::new()))
    }

    pub(super) fn notifier() -> Result<Arc<dyn Notifier>> {
        Ok(Arc::new(TracingNotifier))
    }

    pub(super) fn lifecycle() -> Result<Arc<dyn AppLifecycle>> {
        Ok(Arc::new(DesktopLifecycle::new()))
    }
}

#[cfg(not(feature = "desktop-shims"))]
mod defaults {
    use super::*;

    pub(super) fn http_client() -> Result<Arc<dyn HttpClient>> {
        Err(capability_missing(
            "HttpClient",
            "inject the platform HTTP stack (URLSession/OkHttp/fetch).",
        ))
    }

    pub(super) async fn settings_store(_data_dir: &Path) -> Result<Arc<dyn SettingsStore>> {
        Err(capability_missing(
            "SettingsStore",
            "inject platform settings (UserDefaults/DataStore/localStorage).",
        ))
    }

    pub(super) fn file_exchange() -> Result<Arc<dyn FileExchange>> {
        Err(capability_missing(
            "FileExchange",
            "inject the platform file picker and download handler.",
        ))
    }

    pub(super) fn notifier() -> Result<Arc<dyn Notifier>> {
        Err(capability_missing("Notifier", "inject the UI toast presenter."))
    }

    pub(super) fn lifecycle() -> Result<Arc<dyn AppLifecycle>> {
        Err(capability_missing(
            "AppLifecycle",
            "inject a handler that reloads the UI state.",
        ))
    }
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    data_dir: Option<PathBuf>,
    http_client: Option<Arc<dyn HttpClient>>,
    settings_store: Option<Arc<dyn SettingsStore>>,
    file_exchange: Option<Arc<dyn FileExchange>>,
    notifier: Option<Arc<dyn Notifier>>,
    lifecycle: Option<Arc<dyn AppLifecycle>>,
    clock: Option<Arc<dyn Clock>>,
    event_buffer_size: Option<usize>,
    import_failed_message: Option<String>,
}

impl CoreConfigBuilder {
    /// Sets the directory for on-disk state (required).
    pub fn data_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    pub fn file_exchange(mut self, exchange: Arc<dyn FileExchange>) -> Self {
        self.file_exchange = Some(exchange);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn lifecycle(mut self, lifecycle: Arc<dyn AppLifecycle>) -> Self {
        self.lifecycle = Some(lifecycle);
        self
    }

    /// Overrides the time source (tests, deterministic file names).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Sets the localized toast shown when an import fails.
    pub fn import_failed_message(mut self, message: impl Into<String>) -> Self {
        self.import_failed_message = Some(message.into());
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// Missing capabilities are filled with desktop defaults when the
    /// `desktop-shims` feature is on.
    ///
    /// # Errors
    ///
    /// - `Error::Config` if `data_dir` is missing or a value is invalid
    /// - `Error::CapabilityMissing` if a bridge is absent and no default exists
    pub async fn build(self) -> Result<CoreConfig> {
        let data_dir = self.data_dir.ok_or_else(|| {
            Error::Config("Data directory is required. Use .data_dir() to set it.".to_string())
        })?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => defaults::http_client()?,
        };

        let settings_store = match self.settings_store {
            Some(store) => store,
            None => defaults::settings_store(&data_dir).await?,
        };

        let file_exchange = match self.file_exchange {
            Some(exchange) => exchange,
            None => defaults::file_exchange()?,
        };

        let notifier = match self.notifier {
            Some(notifier) => notifier,
            None => defaults::notifier()?,
        };

        let lifecycle = match self.lifecycle {
            Some(lifecycle) => lifecycle,
            None => defaults::lifecycle()?,
        };

        let config = CoreConfig {
            data_dir,
            http_client,
            settings_store,
            file_exchange,
            notifier,
            lifecycle,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
            import_failed_message: self
                .import_failed_message
                .unwrap_or_else(|| DEFAULT_IMPORT_FAILED_MESSAGE.to_string()),
        };

        config.validate()?;

        Ok(config)
    }
}
