//! # Sync Configuration
//!
//! The persisted settings that decide where application state is mirrored.
//!
//! Exactly one provider sub-config is active at a time, selected by
//! [`SyncConfig::provider`]. Both sub-configs are kept so switching providers
//! back and forth does not lose credentials.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage namespace of the application.
///
/// Used as the WebDAV backup folder and as the Upstash key when no username
/// is configured.
pub const STORAGE_KEY: &str = "chatgpt-next-web";

/// Proxy path used when nothing else is configured.
pub const DEFAULT_PROXY_URL: &str = "/api/cors";

/// Remote storage backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    #[default]
    WebDav,
    Upstash,
}

impl ProviderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::WebDav => "webdav",
            ProviderType::Upstash => "upstash",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// WebDAV account
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebDavConfig {
    pub endpoint: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for WebDavConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebDavConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("password", &redacted(&self.password))
            .finish()
    }
}

/// Upstash (hosted Redis REST) account
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpstashConfig {
    pub endpoint: String,
    pub username: String,
    pub api_key: String,
}

impl Default for UpstashConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            username: STORAGE_KEY.to_string(),
            api_key: String::new(),
        }
    }
}

impl fmt::Debug for UpstashConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstashConfig")
            .field("endpoint", &self.endpoint)
            .field("username", &self.username)
            .field("api_key", &redacted(&self.api_key))
            .finish()
    }
}

fn redacted(secret: &str) -> &'static str {
    if secret.is_empty() {
        ""
    } else {
        "[REDACTED]"
    }
}

/// The sub-config selected by `provider`.
#[derive(Debug, Clone, Copy)]
pub enum ActiveProvider<'a> {
    WebDav(&'a WebDavConfig),
    Upstash(&'a UpstashConfig),
}

impl<'a> ActiveProvider<'a> {
    /// Every field of the sub-config is filled in.
    pub fn is_complete(&self) -> bool {
        match self {
            ActiveProvider::WebDav(c) => {
                !c.endpoint.is_empty() && !c.username.is_empty() && !c.password.is_empty()
            }
            ActiveProvider::Upstash(c) => {
                !c.endpoint.is_empty() && !c.username.is_empty() && !c.api_key.is_empty()
            }
        }
    }

    /// The credentials needed to authenticate are present.
    pub fn has_credentials(&self) -> bool {
        match self {
            ActiveProvider::WebDav(c) => !c.username.is_empty() && !c.password.is_empty(),
            ActiveProvider::Upstash(c) => !c.username.is_empty() && !c.api_key.is_empty(),
        }
    }

    pub fn username(&self) -> &'a str {
        match self {
            ActiveProvider::WebDav(c) => &c.username,
            ActiveProvider::Upstash(c) => &c.username,
        }
    }
}

/// Persisted sync settings.
///
/// Serialized in camelCase; fields missing from stored data fall back to
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncConfig {
    pub provider: ProviderType,
    pub use_proxy: bool,
    pub proxy_url: String,
    pub webdav: WebDavConfig,
    pub upstash: UpstashConfig,
    /// Milliseconds since the Unix epoch; 0 = never synced
    pub last_sync_time: i64,
    /// Provider name recorded at the last completed sync
    pub last_provider: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::default(),
            use_proxy: true,
            proxy_url: DEFAULT_PROXY_URL.to_string(),
            webdav: WebDavConfig::default(),
            upstash: UpstashConfig::default(),
            last_sync_time: 0,
            last_provider: String::new(),
        }
    }
}

impl SyncConfig {
    pub fn active_provider(&self) -> ActiveProvider<'_> {
        match self.provider {
            ProviderType::WebDav => ActiveProvider::WebDav(&self.webdav),
            ProviderType::Upstash => ActiveProvider::Upstash(&self.upstash),
        }
    }

    /// Cloud sync is configured: every field of the active sub-config is set.
    pub fn cloud_sync(&self) -> bool {
        self.active_provider().is_complete()
    }

    pub fn has_account(&self) -> bool {
        self.active_provider().has_credentials()
    }

    /// Key under which state is stored remotely.
    pub fn sync_key(&self) -> &str {
        self.active_provider().username()
    }

    /// Proxy base URL to route through, if any.
    ///
    /// Only absolute `http(s)` URLs are usable outside a browser, so relative
    /// values such as the default `/api/cors` mean a direct connection.
    pub fn proxy_target(&self) -> Option<&str> {
        let url = self.proxy_url.trim();
        let absolute = url.starts_with("http://") || url.starts_with("https://");
        (self.use_proxy && absolute).then_some(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn webdav(endpoint: &str, username: &str, password: &str) -> SyncConfig {
        SyncConfig {
            provider: ProviderType::WebDav,
            webdav: WebDavConfig {
                endpoint: endpoint.to_string(),
                username: username.to_string(),
                password: password.to_string(),
            },
            ..SyncConfig::default()
        }
    }

    fn upstash(endpoint: &str, username: &str, api_key: &str) -> SyncConfig {
        SyncConfig {
            provider: ProviderType::Upstash,
            upstash: UpstashConfig {
                endpoint: endpoint.to_string(),
                username: username.to_string(),
                api_key: api_key.to_string(),
            },
            ..SyncConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();

        assert_eq!(config.provider, ProviderType::WebDav);
        assert!(config.use_proxy);
        assert_eq!(config.proxy_url, "/api/cors");
        assert_eq!(config.webdav.endpoint, "");
        assert_eq!(config.upstash.username, STORAGE_KEY);
        assert_eq!(config.last_sync_time, 0);
        assert!(!config.cloud_sync());
        assert!(!config.has_account());
    }

    #[test]
    fn test_cloud_sync_requires_every_field() {
        assert!(!webdav("", "u", "p").cloud_sync());
        assert!(!webdav("https://dav", "u", "").cloud_sync());
        assert!(webdav("https://dav", "u", "p").cloud_sync());
        assert!(upstash("https://kv", "u", "k").cloud_sync());
        assert!(!upstash("https://kv", "", "k").cloud_sync());
    }

    #[test]
    fn test_whitespace_counts_as_filled() {
        assert!(webdav(" ", " ", " ").cloud_sync());
    }

    #[test]
    fn test_cloud_sync_only_looks_at_active_provider() {
        let mut config = webdav("https://dav", "u", "p");
        config.provider = ProviderType::Upstash;
        config.upstash.api_key.clear();

        assert!(!config.cloud_sync());
    }

    #[test]
    fn test_has_account() {
        assert!(!webdav("", "u", "").has_account());
        assert!(webdav("", "u", "p").has_account());
        assert!(!upstash("", "u", "").has_account());
        assert!(upstash("", "u", "k").has_account());
    }

    #[test]
    fn test_sync_key_follows_provider() {
        let mut config = webdav("https://dav", "alice", "p");
        assert_eq!(config.sync_key(), "alice");

        config.provider = ProviderType::Upstash;
        assert_eq!(config.sync_key(), STORAGE_KEY);
    }

    #[test]
    fn test_proxy_target() {
        let mut config = SyncConfig::default();
        assert_eq!(config.proxy_target(), None);

        config.proxy_url = "https://proxy.example.com".to_string();
        assert_eq!(config.proxy_target(), Some("https://proxy.example.com"));

        config.use_proxy = false;
        assert_eq!(config.proxy_target(), None);
    }

    #[test]
    fn test_serialized_shape() {
        let config = upstash("https://kv", "alice", "k");
        let json = serde_json::to_value(&config).unwrap();

        assert_eq!(json["provider"], "upstash");
        assert_eq!(json["useProxy"], true);
        assert_eq!(json["proxyUrl"], "/api/cors");
        assert_eq!(json["upstash"]["apiKey"], "k");
        assert_eq!(json["lastSyncTime"], 0);
        assert_eq!(json["lastProvider"], "");
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: SyncConfig =
            serde_json::from_str(r#"{"provider":"webdav","webdav":{"username":"u"}}"#).unwrap();

        assert_eq!(config.webdav.username, "u");
        assert_eq!(config.webdav.password, "");
        assert!(config.use_proxy);
        assert_eq!(config.upstash.username, STORAGE_KEY);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", webdav("https://dav", "u", "hunter2"));
        assert!(!rendered.contains("hunter2"));

        let rendered = format!("{:?}", upstash("https://kv", "u", "token-1"));
        assert!(!rendered.contains("token-1"));
    }
}
