//! `media-sync`: uploads the images of a git repository that the WordPress
//! media library does not have yet.
//!
//! Configuration comes from the environment (`GIT_REPO`, `WP_URL`,
//! `WP_USER`, `WP_PASSWD`, plus the optional `SYNC_*` and `LOG_*`
//! variables). Setup failures exit with a non-zero status; failed uploads
//! are logged and do not.

use std::sync::Arc;

use anyhow::{Context, Result};
use bridge_desktop::{GitCliRepository, ReqwestHttpClient};
use core_runtime::logging::{init_logging, redact_url_credentials, LoggingConfig};
use core_runtime::SyncConfig;
use core_sync::{CoordinatorConfig, SyncCoordinator};
use provider_wordpress::{Credentials, WordPressMediaLibrary};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let logging = LoggingConfig::from_env().context("invalid logging settings")?;
    init_logging(logging).context("failed to initialize logging")?;

    let config = SyncConfig::from_env().context("invalid configuration")?;
    info!(?config, "Configuration loaded");

    let repository_url = redact_url_credentials(&config.repository_url);
    info!(url = %repository_url, "Retrieving repository");
    let repository = GitCliRepository::clone_or_open(&config.repository_url, &config.clone_path)
        .await
        .with_context(|| format!("failed to retrieve {}", repository_url))?;

    let http = match config.http_timeout {
        Some(timeout) => ReqwestHttpClient::with_timeout(timeout),
        None => ReqwestHttpClient::new(),
    }
    .context("failed to build HTTP client")?;
    let mut library = WordPressMediaLibrary::new(
        Arc::new(http),
        config.api_base_url(),
        Credentials::new(&config.username, &config.password),
    );
    if let Some(timeout) = config.http_timeout {
        library = library.with_timeout(timeout);
    }

    let coordinator = SyncCoordinator::new(
        CoordinatorConfig::from(&config),
        Arc::new(repository),
        Arc::new(library),
    );
    let summary = coordinator.run().await.context("sync failed")?;

    if summary.report.is_complete() {
        info!(
            commit = %summary.commit_id,
            uploaded = summary.report.uploaded(),
            "All missing assets uploaded"
        );
    } else {
        warn!(
            commit = %summary.commit_id,
            uploaded = summary.report.uploaded(),
            failed = summary.report.failed(),
            skipped = summary.report.skipped(),
            "Some assets were not uploaded"
        );
    }

    Ok(())
}
