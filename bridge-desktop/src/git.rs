//! Content repository backed by the system `git` binary

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    vcs::{CommitInfo, ContentRepository, TreeEntry},
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Refspec mirroring every remote branch onto the local branches
const FETCH_REFSPEC: &str = "+refs/heads/*:refs/heads/*";

/// Git repository accessed through the `git` command line
///
/// Fresh clones are bare and single-branch since only history and objects
/// are needed. An existing regular clone is reused as-is.
#[derive(Debug, Clone)]
pub struct GitCliRepository {
    git_dir: PathBuf,
}

impl GitCliRepository {
    /// Wrap an existing repository without touching the network
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let git_dir = Self::locate_git_dir(path).ok_or_else(|| {
            BridgeError::NotAvailable(format!("{} is not a git repository", path.display()))
        })?;
        Ok(Self { git_dir })
    }

    /// Clone `url` into `path`, or open and update the clone already there
    #[instrument(skip_all)]
    pub async fn clone_or_open(url: &str, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if Self::locate_git_dir(path).is_some() {
            let repository = Self::open(path)?;
            info!(path = %path.display(), "Updating existing clone");
            repository.fetch().await?;
            return Ok(repository);
        }

        info!(path = %path.display(), "Cloning repository");
        let target = path.to_string_lossy();
        run_git(
            None,
            &["clone", "--bare", "--single-branch", "--quiet", url, &target],
        )
        .await?;

        Self::open(path)
    }

    /// Directory holding the repository objects
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    async fn fetch(&self) -> Result<()> {
        // An up-to-date repository is a successful no-op fetch. In a non-bare
        // clone the checked-out branch only moves with --update-head-ok; the
        // worktree itself is never read.
        self.git(&["fetch", "--quiet", "--update-head-ok", "origin", FETCH_REFSPEC])
            .await
            .map(|_| ())
    }

    async fn git(&self, args: &[&str]) -> Result<Vec<u8>> {
        run_git(Some(&self.git_dir), args).await
    }

    fn locate_git_dir(path: &Path) -> Option<PathBuf> {
        let dot_git = path.join(".git");
        if dot_git.is_dir() {
            return Some(dot_git);
        }
        if path.join("HEAD").is_file() && path.join("objects").is_dir() {
            return Some(path.to_path_buf());
        }
        None
    }
}

#[async_trait]
impl ContentRepository for GitCliRepository {
    #[instrument(skip(self))]
    async fn list_commits(&self) -> Result<Vec<CommitInfo>> {
        // A fresh repository has an unborn HEAD: no history rather than an error
        if run_git_status(&self.git_dir, &["rev-parse", "--verify", "--quiet", "HEAD"]).await? {
            let output = self.git(&["log", "--format=%H%x09%ct", "HEAD"]).await?;
            let commits = parse_log(&String::from_utf8_lossy(&output))?;
            debug!(count = commits.len(), "Listed commits");
            Ok(commits)
        } else {
            Ok(Vec::new())
        }
    }

    #[instrument(skip(self))]
    async fn list_files(&self, commit_id: &str) -> Result<Vec<TreeEntry>> {
        let output = self
            .git(&["ls-tree", "-r", "-z", "--full-tree", commit_id])
            .await?;
        parse_ls_tree(&output)
    }

    async fn read_blob(&self, blob_id: &str) -> Result<Bytes> {
        let output = self.git(&["cat-file", "blob", blob_id]).await?;
        Ok(Bytes::from(output))
    }
}

async fn run_git(git_dir: Option<&Path>, args: &[&str]) -> Result<Vec<u8>> {
    let output = git_command(git_dir, args).output().await?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(BridgeError::CommandFailed {
            command: format!("git {}", args.first().copied().unwrap_or_default()),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

async fn run_git_status(git_dir: &Path, args: &[&str]) -> Result<bool> {
    let status = git_command(Some(git_dir), args).status().await?;
    Ok(status.success())
}

fn git_command(git_dir: Option<&Path>, args: &[&str]) -> Command {
    let mut command = Command::new("git");
    if let Some(dir) = git_dir {
        command.arg("--git-dir").arg(dir);
    }
    command
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(std::process::Stdio::null())
        .kill_on_drop(true);
    command
}

/// Parse `git log --format=%H%x09%ct` output
fn parse_log(output: &str) -> Result<Vec<CommitInfo>> {
    output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let (id, timestamp) = line.split_once('\t').ok_or_else(|| {
                BridgeError::OperationFailed(format!("Malformed log line: {}", line))
            })?;
            let seconds: i64 = timestamp.trim().parse().map_err(|e| {
                BridgeError::OperationFailed(format!("Invalid commit timestamp {}: {}", timestamp, e))
            })?;
            let committed_at = DateTime::<Utc>::from_timestamp(seconds, 0).ok_or_else(|| {
                BridgeError::OperationFailed(format!("Commit timestamp out of range: {}", seconds))
            })?;
            Ok(CommitInfo {
                id: id.to_string(),
                committed_at,
            })
        })
        .collect()
}

/// Parse `git ls-tree -r -z` output, keeping blobs only
fn parse_ls_tree(output: &[u8]) -> Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();

    for record in output.split(|byte| *byte == 0).filter(|r| !r.is_empty()) {
        let record = String::from_utf8_lossy(record);
        let (header, path) = record.split_once('\t').ok_or_else(|| {
            BridgeError::OperationFailed(format!("Malformed tree entry: {}", record))
        })?;

        let mut fields = header.split(' ');
        let (_mode, kind, object) = match (fields.next(), fields.next(), fields.next()) {
            (Some(mode), Some(kind), Some(object)) => (mode, kind, object),
            _ => {
                return Err(BridgeError::OperationFailed(format!(
                    "Malformed tree entry header: {}",
                    header
                )))
            }
        };

        // Submodules show up as `commit` entries
        if kind == "blob" {
            entries.push(TreeEntry {
                path: path.to_string(),
                blob_id: object.to_string(),
            });
        }
    }

    Ok(entries)
}
