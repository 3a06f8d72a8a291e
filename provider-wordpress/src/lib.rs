//! # WordPress Media Provider
//!
//! Implements `MediaLibrary` for the WordPress REST API (`wp/v2/media`).
//!
//! ## Overview
//!
//! This module provides:
//! - HTTP basic authentication against `<site>/wp-json/`
//! - Paginated media listing filtered by media type
//! - Media creation from raw bytes with an explicit content type
//! - Status-preserving error mapping so callers can tell gateway failures
//!   from rejected uploads

pub mod connector;
pub mod error;
pub mod types;

pub use connector::{Credentials, WordPressMediaLibrary};
pub use error::{Result, WordPressError};
