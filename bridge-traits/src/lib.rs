//! # Collaborator Traits
//!
//! Contracts between the reconciliation engine and the systems it talks to.
//!
//! ## Overview
//!
//! The sync core never touches git, HTTP or the remote media API directly.
//! Each capability it needs is a trait here, implemented by a platform or
//! provider crate:
//!
//! | Trait | Purpose | Implementation |
//! |-------|---------|----------------|
//! | [`HttpClient`](http::HttpClient) | Async HTTP with retry | `bridge-desktop` (`reqwest`) |
//! | [`ContentRepository`](vcs::ContentRepository) | Commits, trees, file contents | `bridge-desktop` (system `git`) |
//! | [`MediaLibrary`](media::MediaLibrary) | List and create remote media | `provider-wordpress` |
//!
//! ## Error Handling
//!
//! All traits use [`BridgeError`](error::BridgeError). Implementations should
//! convert their own errors into it and keep upstream HTTP statuses in
//! [`BridgeError::HttpStatus`](error::BridgeError::HttpStatus).
//!
//! ## Thread Safety
//!
//! All traits require `Send + Sync`: one instance is shared by every
//! concurrent upload task.

pub mod error;
pub mod http;
pub mod media;
pub mod vcs;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy};
pub use media::{CreatedMedia, MediaItem, MediaLibrary, MediaPage, MediaQuery, MediaUpload};
pub use vcs::{CommitInfo, ContentRepository, TreeEntry};
