//! `VersionControl` backed by the system `git` binary.
//!
//! Shelling out inherits the CI checkout's git config and credential helper,
//! which is what makes the final push authenticate.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::GitError;

use super::{CommitIdentity, CommitOutcome, VersionControl};

/// Check that git is installed and accessible.
pub fn check_git_installed() -> Result<(), GitError> {
    which::which("git").map(|_| ()).map_err(|_| GitError::NotInstalled)
}

/// Runs git commands inside a work tree.
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
}

/// Captured result of a finished git process.
struct GitOutput {
    success: bool,
    code: i32,
    stdout: String,
    stderr: String,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Run git and capture its output regardless of exit status.
    async fn output(&self, args: &[&str], operation: &str) -> Result<GitOutput, GitError> {
        debug!(?args, "running git {}", operation);

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| GitError::SpawnFailed {
                operation: operation.to_string(),
                source,
            })?;

        Ok(GitOutput {
            success: output.status.success(),
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    /// Run git and return stdout, failing on a non-zero exit.
    async fn run(&self, args: &[&str], operation: &str) -> Result<String, GitError> {
        let out = self.output(args, operation).await?;

        if !out.success {
            return Err(GitError::NonZeroExit {
                operation: operation.to_string(),
                code: out.code,
                stderr: out.stderr,
            });
        }

        Ok(out.stdout)
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn fetch_full_history(&self) -> Result<(), GitError> {
        self.run(&["fetch", "--no-tags", "--prune", "--unshallow"], "fetch")
            .await
            .map(|_| ())
    }

    async fn changed_files(&self, base: &str, head: &str) -> Result<Vec<String>, GitError> {
        // -z keeps non-ASCII paths unquoted.
        let stdout = self
            .run(&["diff", "--name-only", "-z", base, head], "diff --name-only")
            .await?;

        Ok(stdout
            .split('\0')
            .filter(|path| !path.is_empty())
            .map(String::from)
            .collect())
    }

    async fn diff_for_path(&self, base: &str, head: &str, path: &str) -> Result<String, GitError> {
        self.run(&["diff", base, head, "--", path], "diff").await
    }

    async fn stage(&self, path: &str) -> Result<(), GitError> {
        self.run(&["add", "--", path], "add").await.map(|_| ())
    }

    async fn configure_identity(&self, identity: &CommitIdentity) -> Result<(), GitError> {
        self.run(&["config", "user.name", &identity.name], "config user.name")
            .await?;
        self.run(&["config", "user.email", &identity.email], "config user.email")
            .await?;
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<CommitOutcome, GitError> {
        let out = self.output(&["commit", "-m", message], "commit").await?;

        if out.success {
            Ok(CommitOutcome::Created)
        } else {
            debug!(code = out.code, stdout = %out.stdout.trim(), stderr = %out.stderr, "git commit made no commit");
            Ok(CommitOutcome::NothingToCommit)
        }
    }

    async fn push(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        self.run(&["push", remote, branch], "push").await.map(|_| ())
    }
}
