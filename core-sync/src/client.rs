//! # Remote Client Factory
//!
//! Builds the [`SyncClient`] for whichever provider a [`SyncConfig`]
//! selects. Clients are cheap and never cached, so every call reflects the
//! current credentials and proxy settings.

use crate::config::{ActiveProvider, SyncConfig, STORAGE_KEY};
use crate::{Result, SyncError};
use bridge_traits::http::HttpClient;
use bridge_traits::storage::SyncClient;
use provider_upstash::{UpstashConnector, UpstashSettings};
use provider_webdav::{WebDavConnector, WebDavSettings};
use std::sync::Arc;
use tracing::debug;

/// Creates remote clients from a config snapshot.
pub trait SyncClientFactory: Send + Sync {
    fn create(&self, config: &SyncConfig) -> Result<Arc<dyn SyncClient>>;
}

/// Factory producing the HTTP connectors shipped with the workspace.
pub struct HttpSyncClientFactory {
    http_client: Arc<dyn HttpClient>,
}

impl HttpSyncClientFactory {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self { http_client }
    }
}

impl SyncClientFactory for HttpSyncClientFactory {
    fn create(&self, config: &SyncConfig) -> Result<Arc<dyn SyncClient>> {
        create_sync_client(Arc::clone(&self.http_client), config)
    }
}

/// Build a client for the provider currently selected in `config`.
///
/// # Errors
///
/// Returns `SyncError::Config` if the provider rejects its settings.
pub fn create_sync_client(
    http_client: Arc<dyn HttpClient>,
    config: &SyncConfig,
) -> Result<Arc<dyn SyncClient>> {
    let proxy_url = config.proxy_target().map(str::to_string);
    debug!(provider = %config.provider, proxied = proxy_url.is_some(), "Creating sync client");

    match config.active_provider() {
        ActiveProvider::WebDav(webdav) => {
            let settings = WebDavSettings {
                endpoint: webdav.endpoint.clone(),
                username: webdav.username.clone(),
                password: webdav.password.clone(),
                folder: STORAGE_KEY.to_string(),
                proxy_url,
            };
            let connector = WebDavConnector::new(http_client, settings)
                .map_err(|e| SyncError::Config(e.to_string()))?;
            Ok(Arc::new(connector))
        }
        ActiveProvider::Upstash(upstash) => {
            let settings = UpstashSettings {
                endpoint: upstash.endpoint.clone(),
                api_key: upstash.api_key.clone(),
                username: upstash.username.clone(),
                fallback_key: STORAGE_KEY.to_string(),
                proxy_url,
            };
            Ok(Arc::new(UpstashConnector::new(http_client, settings)))
        }
    }
}
