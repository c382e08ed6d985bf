//! Workspace placeholder crate.
//!
//! This crate exposes the shared feature flags that map onto the individual
//! workspace crates. Host applications can depend on `chat-sync-workspace`,
//! enable `desktop-shims`, and reach the sync facade without wiring each
//! crate by hand.

#[cfg(feature = "desktop-shims")]
pub use core_service::{CoreService, CoreError};
