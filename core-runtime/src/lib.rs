//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the chat sync core:
//! - Logging and tracing infrastructure
//! - Configuration management with fail-fast capability checks
//! - Event bus for sync and backup events
//!
//! ## Overview
//!
//! Other workspace crates depend on this one for their logging conventions,
//! for the `CoreConfig` that carries host bridges, and for the `EventBus`
//! that observers subscribe to.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
