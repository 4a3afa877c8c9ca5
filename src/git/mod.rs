//! Git collaborator: change detection, staging, commit, and push.

pub mod changes;
pub mod cli;
pub mod repo;

use async_trait::async_trait;

use crate::error::GitError;

pub use changes::{is_markdown_path, markdown_paths};
pub use cli::{GitCli, check_git_installed};
pub use repo::{RepoInfo, discover_repo};

/// Outcome of a commit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Created,
    /// git refused to commit (normally because nothing was staged).
    NothingToCommit,
}

/// Committer identity written to the repository config before committing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitIdentity {
    pub name: String,
    pub email: String,
}

impl Default for CommitIdentity {
    fn default() -> Self {
        Self {
            name: "github-actions".to_string(),
            email: "github-actions@users.noreply.github.com".to_string(),
        }
    }
}

/// Version-control operations the reformat pipeline depends on.
///
/// This abstraction allows mocking git in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Fetch the full history of a shallow clone.
    async fn fetch_full_history(&self) -> Result<(), GitError>;

    /// Paths that differ between `base` and `head`, in git's order.
    async fn changed_files(&self, base: &str, head: &str) -> Result<Vec<String>, GitError>;

    /// Unified diff between `base` and `head` restricted to one path.
    async fn diff_for_path(&self, base: &str, head: &str, path: &str) -> Result<String, GitError>;

    /// Stage a path for the next commit.
    async fn stage(&self, path: &str) -> Result<(), GitError>;

    /// Set `user.name` and `user.email` in the repository config.
    async fn configure_identity(&self, identity: &CommitIdentity) -> Result<(), GitError>;

    /// Commit whatever is staged.
    async fn commit(&self, message: &str) -> Result<CommitOutcome, GitError>;

    /// Push `branch` to `remote`.
    async fn push(&self, remote: &str, branch: &str) -> Result<(), GitError>;
}
