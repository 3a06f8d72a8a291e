//! # Sync Coordinator
//!
//! Runs one reconciliation pass between the content repository and the
//! media library.
//!
//! ## Workflow
//!
//! 1. Pick the most recent commit by committer timestamp
//! 2. Extract local image assets and fetch the remote inventory concurrently
//! 3. Compute the assets missing remotely
//! 4. Upload them through the [`UploadDispatcher`]
//!
//! Setup failures (no commits, unreadable tree, failed listing) abort the
//! run with an error. Per-asset failures end up in the [`DispatchReport`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use core_sync::{CoordinatorConfig, SyncCoordinator};
//! use std::sync::Arc;
//!
//! # async fn example(repo: Arc<dyn bridge_traits::ContentRepository>, library: Arc<dyn bridge_traits::MediaLibrary>) -> core_sync::Result<()> {
//! let coordinator = SyncCoordinator::new(CoordinatorConfig::default(), repo, library);
//! let summary = coordinator.run().await?;
//! println!("uploaded {} of {}", summary.report.uploaded(), summary.missing_assets);
//! # Ok(())
//! # }
//! ```

use crate::{
    difference::missing_assets,
    dispatcher::{DispatchReport, UploadDispatcher},
    inventory::{latest_commit, load_local_assets, LocalAsset},
    remote::RemoteInventoryFetcher,
    Result, SyncError,
};
use bridge_traits::{media::MediaLibrary, vcs::ContentRepository};
use core_runtime::config::{SyncConfig, DEFAULT_MARKER};
use std::sync::Arc;
use tracing::{info, instrument};

/// Coordinator settings
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Path segment selecting image assets
    pub marker: String,

    /// Upload cap; `None` runs every upload at once
    pub max_concurrent_uploads: Option<usize>,

    /// Treat remote listing failures as the end of the listing
    pub lenient_listing: bool,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            max_concurrent_uploads: None,
            lenient_listing: false,
        }
    }
}

impl From<&SyncConfig> for CoordinatorConfig {
    fn from(config: &SyncConfig) -> Self {
        Self {
            marker: config.marker.clone(),
            max_concurrent_uploads: config.max_concurrent_uploads,
            lenient_listing: config.lenient_listing,
        }
    }
}

/// What a run found and did
#[derive(Debug, Clone)]
pub struct SyncSummary {
    /// Commit the local inventory was taken from
    pub commit_id: String,
    pub local_assets: usize,
    pub remote_assets: usize,
    pub missing_assets: usize,
    pub report: DispatchReport,
}

pub struct SyncCoordinator {
    config: CoordinatorConfig,
    repository: Arc<dyn ContentRepository>,
    library: Arc<dyn MediaLibrary>,
}

impl SyncCoordinator {
    pub fn new(
        config: CoordinatorConfig,
        repository: Arc<dyn ContentRepository>,
        library: Arc<dyn MediaLibrary>,
    ) -> Self {
        Self {
            config,
            repository,
            library,
        }
    }

    #[instrument(skip(self), fields(marker = %self.config.marker))]
    pub async fn run(&self) -> Result<SyncSummary> {
        let commits = self
            .repository
            .list_commits()
            .await
            .map_err(|e| SyncError::Repository(e.to_string()))?;
        let latest = latest_commit(&commits)?;
        info!(
            commit = %latest.id,
            committed_at = %latest.committed_at,
            "Using latest commit"
        );

        let fetcher = RemoteInventoryFetcher::new(Arc::clone(&self.library))
            .lenient(self.config.lenient_listing);

        let (local, remote) = tokio::join!(
            load_local_assets(self.repository.as_ref(), &latest.id, &self.config.marker),
            fetcher.fetch(),
        );
        let local = local?;
        let remote = remote?;
        info!(count = local.len(), "Found local image assets");
        info!(count = remote.len(), "Found remote media files");

        let missing: Vec<LocalAsset> = missing_assets(&local, &remote)
            .into_iter()
            .cloned()
            .collect();
        info!(count = missing.len(), "Assets missing remotely");

        let missing_count = missing.len();
        let report = if missing.is_empty() {
            DispatchReport::default()
        } else {
            self.dispatcher().dispatch(missing).await
        };

        info!(
            uploaded = report.uploaded(),
            failed = report.failed(),
            skipped = report.skipped(),
            "Sync finished"
        );

        Ok(SyncSummary {
            commit_id: latest.id.clone(),
            local_assets: local.len(),
            remote_assets: remote.len(),
            missing_assets: missing_count,
            report,
        })
    }

    fn dispatcher(&self) -> UploadDispatcher {
        let dispatcher =
            UploadDispatcher::new(Arc::clone(&self.repository), Arc::clone(&self.library));
        match self.config.max_concurrent_uploads {
            Some(max) => dispatcher.with_max_concurrent(max),
            None => dispatcher,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_config_from_sync_config() {
        let sync_config = SyncConfig::builder()
            .repository_url("https://example.com/site.git")
            .site_url("https://blog.example.com")
            .credentials("editor", "secret")
            .marker("_media")
            .max_concurrent_uploads(3)
            .lenient_listing(true)
            .http_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        let config = CoordinatorConfig::from(&sync_config);

        assert_eq!(config.marker, "_media");
        assert_eq!(config.max_concurrent_uploads, Some(3));
        assert!(config.lenient_listing);
    }

    #[test]
    fn test_default_config() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.marker, "_images");
        assert!(config.max_concurrent_uploads.is_none());
        assert!(!config.lenient_listing);
    }
}
