//! # WebDAV Provider
//!
//! Implements the `SyncClient` trait for WebDAV servers.
//!
//! ## Overview
//!
//! This module provides:
//! - Basic authentication against the configured server
//! - A single `backup.json` document per backup collection
//! - Collection probing/creation through `MKCOL`
//! - Optional routing through a CORS proxy (`/api/webdav/...`)

pub mod connector;
pub mod error;

pub use connector::{WebDavConnector, WebDavSettings};
pub use error::{Result, WebDavError};
