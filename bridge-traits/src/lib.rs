//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host platform.
//!
//! ## Overview
//!
//! This crate defines the contract between the sync core and platform-specific
//! implementations. Each trait represents a capability that the core requires
//! but that must be implemented differently per platform (desktop, web).
//!
//! ## Traits
//!
//! ### Networking & Remote Storage
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations with retry and TLS
//! - [`SyncClient`](storage::SyncClient) - Remote key-value endpoint (WebDAV, Upstash)
//!
//! ### Local Storage
//! - [`SettingsStore`](storage::SettingsStore) - Key-value preferences storage
//! - [`FileExchange`](storage::FileExchange) - Backup file download and upload
//!
//! ### Host Shell
//! - [`Notifier`](host::Notifier) - Toast notifications
//! - [`AppLifecycle`](host::AppLifecycle) - Full application reload
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Platform
//! implementations should convert platform-specific errors to `BridgeError`
//! and keep enough context (status codes, paths) for the message to be
//! actionable.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single implementation can be
//! shared across async tasks behind an `Arc`.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::storage::SyncClient;
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct InMemoryRemote {
//!     value: tokio::sync::Mutex<Option<String>>,
//! }
//!
//! #[async_trait]
//! impl SyncClient for InMemoryRemote {
//!     async fn get(&self, _key: &str) -> Result<Option<String>> {
//!         Ok(self.value.lock().await.clone())
//!     }
//!
//!     async fn set(&self, _key: &str, value: &str) -> Result<()> {
//!         *self.value.lock().await = Some(value.to_string());
//!         Ok(())
//!     }
//!
//!     async fn check(&self) -> Result<bool> {
//!         Ok(true)
//!     }
//! }
//! ```

pub mod error;
pub mod host;
pub mod http;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use host::{AppLifecycle, Notifier};
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use storage::{FileExchange, SettingsStore, SyncClient};
pub use time::{Clock, FixedClock, LogEntry, LogLevel, LoggerSink, SystemClock};
