//! # Desktop Bridge Implementations
//!
//! Native implementations of the collaborator traits for desktop and server
//! hosts (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`
//! - `ContentRepository` using the system `git` binary through
//!   `tokio::process`
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{GitCliRepository, ReqwestHttpClient};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let http_client = ReqwestHttpClient::with_timeout(Duration::from_secs(60))?;
//!     let repository = GitCliRepository::clone_or_open("https://example.com/site.git", "repo").await?;
//!     // Hand both to the sync coordinator
//!     Ok(())
//! }
//! ```

mod git;
mod http;

pub use git::GitCliRepository;
pub use http::ReqwestHttpClient;
