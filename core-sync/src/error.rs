use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Repository has no commits")]
    NoCommits,

    #[error("File listing unavailable for commit {commit}: {message}")]
    ListingUnavailable { commit: String, message: String },

    #[error("Remote media listing failed on page {page}: {message}")]
    RemoteListing { page: u32, message: String },
}

pub type Result<T> = std::result::Result<T, SyncError>;
