//! # Local Inventory
//!
//! Selects the image assets of one repository revision.
//!
//! A tree entry becomes a [`LocalAsset`] when its path contains the marker
//! segment (`_images` by default). Spaces in the path are replaced with
//! underscores, and the lower-cased base name of the result is the key the
//! asset is matched on against the remote library.

use crate::{Result, SyncError};
use bridge_traits::vcs::{CommitInfo, ContentRepository, TreeEntry};
use tracing::debug;

/// An image file found in the selected revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalAsset {
    /// Path as stored in the revision tree
    pub path: String,
    /// Path with spaces replaced by underscores
    pub name: String,
    /// Blob holding the file content
    pub blob_id: String,
}

impl LocalAsset {
    /// Builds an asset from a tree entry.
    pub fn from_entry(entry: TreeEntry) -> Self {
        Self {
            name: entry.path.replace(' ', "_"),
            path: entry.path,
            blob_id: entry.blob_id,
        }
    }

    /// Base name used as upload filename (`pic_1.png`)
    pub fn file_name(&self) -> &str {
        base_name(&self.name)
    }

    /// Matching key against the remote inventory (`pic_1.png`, lower-cased)
    pub fn key(&self) -> String {
        normalize_name(&self.name)
    }
}

/// Normalizes a file name into its matching key.
///
/// Replaces spaces with underscores, drops directory components and
/// lower-cases the result. Applying it twice yields the same key.
pub fn normalize_name(name: &str) -> String {
    base_name(&name.replace(' ', "_")).to_lowercase()
}

fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Picks the most recently committed revision.
///
/// Single pass over `commits`; on equal timestamps the earlier entry wins.
pub fn latest_commit(commits: &[CommitInfo]) -> Result<&CommitInfo> {
    commits
        .iter()
        .reduce(|best, commit| {
            if commit.committed_at > best.committed_at {
                commit
            } else {
                best
            }
        })
        .ok_or(SyncError::NoCommits)
}

/// Keeps the entries whose path contains `marker`, in listing order.
pub fn extract_local_assets(entries: Vec<TreeEntry>, marker: &str) -> Vec<LocalAsset> {
    entries
        .into_iter()
        .filter(|entry| entry.path.contains(marker))
        .map(LocalAsset::from_entry)
        .collect()
}

/// Lists `commit_id` and extracts its assets.
pub async fn load_local_assets(
    repository: &dyn ContentRepository,
    commit_id: &str,
    marker: &str,
) -> Result<Vec<LocalAsset>> {
    let entries = repository
        .list_files(commit_id)
        .await
        .map_err(|e| SyncError::ListingUnavailable {
            commit: commit_id.to_string(),
            message: e.to_string(),
        })?;

    debug!(commit = %commit_id, entries = entries.len(), "Listed revision tree");

    Ok(extract_local_assets(entries, marker))
}
