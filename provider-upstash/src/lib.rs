//! # Upstash Provider
//!
//! Implements the `SyncClient` trait for the Upstash Redis REST API.
//!
//! ## Overview
//!
//! This module provides:
//! - Bearer-token authentication
//! - Chunked values (`{key}-chunk-{i}` plus `{key}-chunk-count`) to stay
//!   under the per-request size limit
//! - Optional routing through a CORS proxy (`/api/upstash/...`)

pub mod connector;
pub mod error;
pub mod types;

pub use connector::{UpstashConnector, UpstashSettings, MAX_CHUNK_BYTES};
pub use error::{Result, UpstashError};
