//! Storage Abstractions
//!
//! Provides platform-agnostic traits for key-value settings storage, remote
//! sync endpoints, and user-facing backup files.

use async_trait::async_trait;

use crate::error::Result;

/// Key-value settings storage trait
///
/// Abstracts platform-specific preferences/settings storage:
/// - Desktop: SQLite-backed key-value table
/// - Mobile: UserDefaults / DataStore
/// - Web: localStorage / IndexedDB
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::SettingsStore;
///
/// async fn save_preference(store: &dyn SettingsStore) -> Result<()> {
///     store.set_string("sync", r#"{"state":{},"version":1.2}"#).await?;
///     store.set_bool("use_proxy", true).await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Store a string value
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve a string value
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Store a boolean value
    async fn set_bool(&self, key: &str, value: bool) -> Result<()>;

    /// Retrieve a boolean value
    async fn get_bool(&self, key: &str) -> Result<Option<bool>>;

    /// Store an integer value
    async fn set_i64(&self, key: &str, value: i64) -> Result<()>;

    /// Retrieve an integer value
    async fn get_i64(&self, key: &str) -> Result<Option<i64>>;

    /// Delete a setting
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a setting exists
    async fn has_key(&self, key: &str) -> Result<bool>;

    /// List all setting keys
    async fn list_keys(&self) -> Result<Vec<String>>;

    /// Clear all settings
    async fn clear_all(&self) -> Result<()>;
}

/// Remote key-value endpoint used to mirror application state.
///
/// Each provider (WebDAV, Upstash) ships its own implementation. A client is
/// bound to one provider configuration at construction time.
///
/// # Contract
///
/// - `get` returns `Ok(None)` or `Ok(Some(""))` when the remote holds no data
/// - `set` overwrites unconditionally
/// - transport and authentication failures surface as `Err`
#[async_trait]
pub trait SyncClient: Send + Sync {
    /// Fetch the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Verify that the endpoint is reachable with the configured credentials.
    async fn check(&self) -> Result<bool>;
}

/// User-facing backup file exchange.
///
/// - Desktop: writes into the downloads directory, reads a chosen path
/// - Web: triggers a browser download, opens a file picker
#[async_trait]
pub trait FileExchange: Send + Sync {
    /// Hand `content` to the user as a file named `file_name`.
    async fn download_as(&self, content: &str, file_name: &str) -> Result<()>;

    /// Read the text of a file picked by the user.
    ///
    /// Returns `Ok(None)` when the user cancelled the selection.
    async fn read_from_file(&self) -> Result<Option<String>>;
}
