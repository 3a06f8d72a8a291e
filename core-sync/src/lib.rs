//! # Sync & Reconciliation Module
//!
//! Reconciles the image assets of a content repository with a remote media
//! library, uploading what the library is missing.
//!
//! ## Components
//!
//! - **Local Inventory** (`inventory`): Selects marker-path assets of the latest commit
//! - **Remote Inventory** (`remote`): Paginated listing of remote file names
//! - **Difference** (`difference`): Case-insensitive base-name matching
//! - **Content Type** (`content_type`): MIME detection from leading bytes
//! - **Upload Dispatcher** (`dispatcher`): Concurrent uploads with per-asset failure isolation
//! - **Sync Coordinator** (`coordinator`): Runs one full pass

pub mod content_type;
pub mod coordinator;
pub mod difference;
pub mod dispatcher;
pub mod error;
pub mod inventory;
pub mod remote;

pub use content_type::detect_content_type;
pub use coordinator::{CoordinatorConfig, SyncCoordinator, SyncSummary};
pub use difference::missing_assets;
pub use dispatcher::{
    DispatchReport, FailureKind, UploadDispatcher, UploadFailure, UploadOutcome, UploadResult,
};
pub use error::{Result, SyncError};
pub use inventory::{extract_local_assets, latest_commit, normalize_name, LocalAsset};
pub use remote::{RemoteInventory, RemoteInventoryFetcher};
