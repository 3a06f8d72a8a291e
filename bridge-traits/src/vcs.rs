//! Version-Control Backend Abstraction
//!
//! Read-only view of a content repository: its commit history, the file tree
//! of a commit, and lazy access to file contents.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::Result;

/// A commit of the content repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub id: String,
    pub committed_at: DateTime<Utc>,
}

/// A file entry of a commit's tree
///
/// The entry does not hold the file contents; they are read on demand through
/// [`ContentRepository::read_blob`] with `blob_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Path relative to the repository root, `/`-separated
    pub path: String,
    /// Object id of the file contents
    pub blob_id: String,
}

/// Content repository trait
///
/// Implementations wrap an already cloned or opened repository; acquiring it
/// is the implementation's constructor concern.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Commits of the default branch, in no particular order
    async fn list_commits(&self) -> Result<Vec<CommitInfo>>;

    /// Every file of the tree at `commit_id`
    async fn list_files(&self, commit_id: &str) -> Result<Vec<TreeEntry>>;

    /// Contents of one file
    async fn read_blob(&self, blob_id: &str) -> Result<Bytes>;
}
