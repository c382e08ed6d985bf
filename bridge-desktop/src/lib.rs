//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `SettingsStore` using a SQLite-backed key-value table
//! - `FileExchange` using `tokio::fs` and the user's downloads directory
//! - `Notifier` routed into `tracing`
//! - `AppLifecycle` publishing reload requests on a watch channel
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{ReqwestHttpClient, SqliteSettingsStore};
//!
//! #[tokio::main]
//! async fn main() -> bridge_traits::error::Result<()> {
//!     let http_client = ReqwestHttpClient::new()?;
//!     let settings = SqliteSettingsStore::new("settings.db".into()).await?;
//!     // Hand both to core_runtime::config::CoreConfig::builder()
//!     Ok(())
//! }
//! ```

mod exchange;
mod host;
mod http;
mod settings;

pub use exchange::DesktopFileExchange;
pub use host::{DesktopLifecycle, TracingNotifier};
pub use http::ReqwestHttpClient;
pub use settings::SqliteSettingsStore;
