//! # Upload Dispatcher
//!
//! Uploads missing assets to the media library concurrently.
//!
//! One task is spawned per asset and the dispatcher waits for all of them.
//! A failing asset never affects its siblings: unreadable content is
//! reported as skipped, a rejected upload as failed. Uploads are not
//! retried.
//!
//! Concurrency is unbounded unless a cap is set with
//! [`UploadDispatcher::with_max_concurrent`]. Unbounded dispatch opens one
//! connection per missing asset, which can exhaust sockets or memory on very
//! large batches.

use crate::content_type::detect_content_type;
use crate::inventory::LocalAsset;
use bridge_traits::error::BridgeError;
use bridge_traits::media::{CreatedMedia, MediaLibrary, MediaUpload};
use bridge_traits::vcs::ContentRepository;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Classification of a failed upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Upstream gateway error (502)
    BadGateway,
    /// Credentials rejected (401/403)
    Unauthorized,
    /// Request refused (other 4xx)
    Rejected,
    /// Server error (other 5xx)
    Server,
    /// No response status (connection, timeout, parse)
    Transport,
    /// The upload task panicked or was cancelled before reporting
    Aborted,
}

impl FailureKind {
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(502) => FailureKind::BadGateway,
            Some(401) | Some(403) => FailureKind::Unauthorized,
            Some(400..=499) => FailureKind::Rejected,
            Some(500..=599) => FailureKind::Server,
            _ => FailureKind::Transport,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::BadGateway => "bad gateway",
            FailureKind::Unauthorized => "unauthorized",
            FailureKind::Rejected => "rejected",
            FailureKind::Server => "server error",
            FailureKind::Transport => "transport error",
            FailureKind::Aborted => "aborted",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFailure {
    pub kind: FailureKind,
    pub status: Option<u16>,
    pub message: String,
}

impl From<&BridgeError> for UploadFailure {
    fn from(error: &BridgeError) -> Self {
        let status = error.status_code();
        Self {
            kind: FailureKind::from_status(status),
            status,
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded(CreatedMedia),
    Failed(UploadFailure),
    /// Not attempted (unreadable content or duplicate key)
    Skipped(String),
}

/// Outcome of one asset
#[derive(Debug, Clone)]
pub struct UploadResult {
    pub asset: LocalAsset,
    pub outcome: UploadOutcome,
}

/// Results of a dispatch, in completion order
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub results: Vec<UploadResult>,
}

impl DispatchReport {
    pub fn uploaded(&self) -> usize {
        self.count(|o| matches!(o, UploadOutcome::Uploaded(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, UploadOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, UploadOutcome::Skipped(_)))
    }

    /// True when every asset was uploaded
    pub fn is_complete(&self) -> bool {
        self.uploaded() == self.results.len()
    }

    fn count(&self, predicate: impl Fn(&UploadOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| predicate(&r.outcome)).count()
    }
}

pub struct UploadDispatcher {
    repository: Arc<dyn ContentRepository>,
    library: Arc<dyn MediaLibrary>,
    limit: Option<Arc<Semaphore>>,
}

impl UploadDispatcher {
    pub fn new(repository: Arc<dyn ContentRepository>, library: Arc<dyn MediaLibrary>) -> Self {
        Self {
            repository,
            library,
            limit: None,
        }
    }

    /// Caps the number of uploads in flight.
    ///
    /// The cap is clamped to `1..=Semaphore::MAX_PERMITS`, so neither 0 nor
    /// `usize::MAX` can stall or panic the dispatch.
    pub fn with_max_concurrent(mut self, max: usize) -> Self {
        let permits = max.clamp(1, Semaphore::MAX_PERMITS);
        self.limit = Some(Arc::new(Semaphore::new(permits)));
        self
    }

    /// Uploads every asset and waits for all attempts to finish.
    ///
    /// Assets sharing a key with an earlier one are reported as skipped.
    /// Every asset ends up in the report exactly once, including those whose
    /// task panicked.
    pub async fn dispatch(&self, missing: Vec<LocalAsset>) -> DispatchReport {
        let mut report = DispatchReport::default();
        let mut tasks = JoinSet::new();
        // Spawned assets without a result yet, by key
        let mut pending: HashMap<String, LocalAsset> = HashMap::new();

        for asset in missing {
            if pending.contains_key(&asset.key()) {
                info!(path = %asset.path, "Skipping duplicate file name");
                report.results.push(UploadResult {
                    outcome: UploadOutcome::Skipped(format!(
                        "duplicate of another {}",
                        asset.file_name()
                    )),
                    asset,
                });
                continue;
            }

            pending.insert(asset.key(), asset.clone());
            let repository = Arc::clone(&self.repository);
            let library = Arc::clone(&self.library);
            let limit = self.limit.clone();

            tasks.spawn(async move {
                // Held until the upload finishes
                let _permit = match limit {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                upload_asset(repository.as_ref(), library.as_ref(), asset).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => {
                    pending.remove(&result.asset.key());
                    report.results.push(result);
                }
                Err(e) => error!(error = %e, "Upload task aborted"),
            }
        }

        for (_, asset) in pending {
            report.results.push(UploadResult {
                outcome: UploadOutcome::Failed(UploadFailure {
                    kind: FailureKind::Aborted,
                    status: None,
                    message: "upload task panicked or was cancelled".to_string(),
                }),
                asset,
            });
        }

        info!(
            uploaded = report.uploaded(),
            failed = report.failed(),
            skipped = report.skipped(),
            "Upload dispatch finished"
        );

        report
    }
}

async fn upload_asset(
    repository: &dyn ContentRepository,
    library: &dyn MediaLibrary,
    asset: LocalAsset,
) -> UploadResult {
    let data = match repository.read_blob(&asset.blob_id).await {
        Ok(data) => data,
        Err(e) => {
            warn!(path = %asset.path, error = %e, "Cannot read file, skipping");
            return UploadResult {
                outcome: UploadOutcome::Skipped(format!("content unreadable: {}", e)),
                asset,
            };
        }
    };

    let content_type = detect_content_type(&data);
    info!(
        file = %asset.file_name(),
        content_type,
        size = data.len(),
        "Uploading"
    );

    let upload = MediaUpload {
        data,
        filename: asset.file_name().to_string(),
        content_type: content_type.to_string(),
    };

    let outcome = match library.create_media(upload).await {
        Ok(created) => {
            info!(
                id = created.id,
                title = %created.title,
                url = %created.source_url,
                "Uploaded"
            );
            UploadOutcome::Uploaded(created)
        }
        Err(e) => {
            let failure = UploadFailure::from(&e);
            match failure.kind {
                FailureKind::BadGateway => error!(
                    file = %asset.file_name(),
                    error = %e,
                    "Upload failed: bad gateway (502) from upstream"
                ),
                kind => warn!(
                    file = %asset.file_name(),
                    %kind,
                    error = %e,
                    "Upload failed"
                ),
            }
            UploadOutcome::Failed(failure)
        }
    };

    UploadResult { asset, outcome }
}
