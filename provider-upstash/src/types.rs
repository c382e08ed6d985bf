//! Upstash REST API response types

use serde::Deserialize;

/// Envelope of every Upstash REST command response
///
/// See: https://upstash.com/docs/redis/features/restapi
#[derive(Debug, Deserialize)]
pub struct CommandResponse {
    /// Command result; `null` when the key does not exist
    #[serde(default)]
    pub result: Option<String>,
}
