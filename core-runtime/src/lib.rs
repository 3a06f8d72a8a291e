//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the media sync engine:
//! - Configuration management (builder plus environment loading)
//! - Logging and tracing infrastructure
//!
//! ## Overview
//!
//! This crate contains the process-level concerns other crates depend on. It
//! establishes the logging conventions and the validated configuration the
//! sync coordinator is built from.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{SyncConfig, SyncConfigBuilder};
pub use error::{Error, Result};
