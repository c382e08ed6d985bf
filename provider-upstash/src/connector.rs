//! Upstash connector implementation
//!
//! Stores one value as a sequence of chunk keys plus a count key, since the
//! REST API caps request bodies at 1MB on the entry plans.

use async_trait::async_trait;
use bridge_traits::error::Result;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::storage::SyncClient;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use crate::error::UpstashError;
use crate::types::CommandResponse;

/// Route prefix of the CORS proxy for Upstash traffic
const PROXY_PATH_PREFIX: &str = "/api/upstash/";

/// Largest chunk written under a single key, in bytes
pub const MAX_CHUNK_BYTES: usize = 1_000_000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for one Upstash database
#[derive(Clone)]
pub struct UpstashSettings {
    /// REST endpoint, e.g. `https://eu1-xyz.upstash.io`
    pub endpoint: String,
    /// REST token
    pub api_key: String,
    /// Account key probed by `check`; empty means `fallback_key`
    pub username: String,
    /// Key used when the caller passes an empty one
    pub fallback_key: String,
    /// Absolute URL of a CORS proxy; `None` talks to Upstash directly
    pub proxy_url: Option<String>,
}

impl fmt::Debug for UpstashSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UpstashSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("username", &self.username)
            .field("fallback_key", &self.fallback_key)
            .field("proxy_url", &self.proxy_url)
            .finish()
    }
}

/// Split `value` into pieces of at most `max_bytes` bytes.
///
/// Pieces always end on a char boundary, so concatenating them restores
/// the input exactly. A single char wider than `max_bytes` becomes its own
/// piece.
pub(crate) fn split_chunks(value: &str, max_bytes: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = value;

    while !rest.is_empty() {
        let mut end = rest.len().min(max_bytes);
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        if end == 0 {
            end = rest.chars().next().map(char::len_utf8).unwrap_or(rest.len());
        }

        let (head, tail) = rest.split_at(end);
        chunks.push(head);
        rest = tail;
    }

    chunks
}

/// Upstash connector
///
/// # Example
///
/// ```ignore
/// use provider_upstash::{UpstashConnector, UpstashSettings};
/// use bridge_traits::storage::SyncClient;
///
/// let connector = UpstashConnector::new(http_client, settings);
/// connector.set("alice", &state_json).await?;
/// let restored = connector.get("alice").await?;
/// ```
pub struct UpstashConnector {
    http_client: Arc<dyn HttpClient>,
    settings: UpstashSettings,
}

impl UpstashConnector {
    pub fn new(http_client: Arc<dyn HttpClient>, settings: UpstashSettings) -> Self {
        Self {
            http_client,
            settings,
        }
    }

    fn store_key<'a>(&'a self, key: &'a str) -> &'a str {
        if key.is_empty() {
            &self.settings.fallback_key
        } else {
            key
        }
    }

    fn chunk_count_key(store_key: &str) -> String {
        format!("{}-chunk-count", store_key)
    }

    fn chunk_key(store_key: &str, index: usize) -> String {
        format!("{}-chunk-{}", store_key, index)
    }

    /// Build the URL for a REST command (`get`/`set`) on `key`.
    fn url(&self, command: &str, key: &str) -> String {
        let key = urlencoding::encode(key);

        match self.settings.proxy_url.as_deref() {
            Some(proxy) => format!(
                "{}{}{}/{}/?endpoint={}",
                proxy.trim_end_matches('/'),
                PROXY_PATH_PREFIX,
                command,
                key,
                urlencoding::encode(&self.settings.endpoint)
            ),
            None => format!(
                "{}/{}/{}",
                self.settings.endpoint.trim_end_matches('/'),
                command,
                key
            ),
        }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        let request = request
            .bearer_token(&self.settings.api_key)
            .timeout(REQUEST_TIMEOUT);
        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            return Err(UpstashError::from_status(response.status, &response.body).into());
        }
        Ok(response)
    }

    async fn redis_get(&self, key: &str) -> Result<Option<String>> {
        let response = self
            .send(HttpRequest::new(HttpMethod::Get, self.url("get", key)))
            .await?;
        let parsed: CommandResponse = response
            .json()
            .map_err(|e| UpstashError::ParseError(e.to_string()))?;
        Ok(parsed.result)
    }

    async fn redis_set(&self, key: &str, value: &str) -> Result<()> {
        self.send(HttpRequest::new(HttpMethod::Post, self.url("set", key)).text(value))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl SyncClient for UpstashConnector {
    #[instrument(skip(self), fields(endpoint = %self.settings.endpoint))]
    async fn check(&self) -> Result<bool> {
        let key = self.store_key(&self.settings.username);
        let request = HttpRequest::new(HttpMethod::Get, self.url("get", key))
            .bearer_token(&self.settings.api_key)
            .timeout(REQUEST_TIMEOUT);

        match self.http_client.execute(request).await {
            Ok(response) => {
                info!(status = response.status, "Upstash check finished");
                Ok(response.status == 200)
            }
            Err(e) => {
                error!(error = %e, "Upstash check failed");
                Ok(false)
            }
        }
    }

    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let store_key = self.store_key(key);

        let count = match self.redis_get(&Self::chunk_count_key(store_key)).await? {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(count) => count,
                Err(_) => {
                    debug!(raw = %raw, "Chunk count is not a number");
                    return Ok(None);
                }
            },
            None => {
                debug!("No chunk count stored");
                return Ok(None);
            }
        };

        let mut value = String::new();
        for index in 0..count {
            match self.redis_get(&Self::chunk_key(store_key, index)).await? {
                Some(chunk) => value.push_str(&chunk),
                None => return Err(UpstashError::MissingChunk { index, count }.into()),
            }
        }

        debug!(chunks = count, bytes = value.len(), "Upstash get finished");
        Ok(Some(value))
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let store_key = self.store_key(key);
        let chunks = split_chunks(value, MAX_CHUNK_BYTES);

        for (index, chunk) in chunks.iter().enumerate() {
            self.redis_set(&Self::chunk_key(store_key, index), chunk)
                .await?;
        }
        // Count goes last so readers never see a count ahead of its chunks.
        self.redis_set(&Self::chunk_count_key(store_key), &chunks.len().to_string())
            .await?;

        debug!(chunks = chunks.len(), "Upstash set finished");
        Ok(())
    }
}
