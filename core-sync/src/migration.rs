//! # Config Migration
//!
//! Ordered, versioned rewrites of a persisted [`SyncConfig`].
//!
//! A step runs when the stored version is lower than the step's version.
//! Steps are pure and idempotent; there is no downgrade path.

use crate::config::{SyncConfig, STORAGE_KEY};
use tracing::info;

/// Version written alongside every persisted config.
pub const CURRENT_VERSION: f64 = 1.2;

/// Proxy value shipped by old releases that no longer resolves.
const LEGACY_PROXY_URL: &str = "/api/cors/";

/// One migration step
#[derive(Debug, Clone, Copy)]
pub struct MigrationStep {
    /// Config version this step upgrades to
    pub version: f64,
    pub name: &'static str,
    pub apply: fn(&mut SyncConfig),
}

/// All steps, oldest first.
pub const MIGRATIONS: &[MigrationStep] = &[
    MigrationStep {
        version: 1.1,
        name: "upstash_username_storage_key",
        apply: upstash_username_storage_key,
    },
    MigrationStep {
        version: 1.2,
        name: "clear_legacy_proxy_url",
        apply: clear_legacy_proxy_url,
    },
];

// Older builds defaulted the Upstash username to something other than the
// storage key.
fn upstash_username_storage_key(config: &mut SyncConfig) {
    config.upstash.username = STORAGE_KEY.to_string();
}

fn clear_legacy_proxy_url(config: &mut SyncConfig) {
    if config.proxy_url == LEGACY_PROXY_URL {
        config.proxy_url.clear();
    }
}

/// Bring `config` from `from_version` up to [`CURRENT_VERSION`].
///
/// Returns the number of steps applied.
pub fn migrate(config: &mut SyncConfig, from_version: f64) -> usize {
    let mut applied = 0;

    for step in MIGRATIONS.iter().filter(|step| from_version < step.version) {
        info!(step = step.name, version = step.version, "Applying sync config migration");
        (step.apply)(config);
        applied += 1;
    }

    applied
}
