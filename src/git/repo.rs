//! Repository discovery using git2.

use std::path::{Path, PathBuf};

use git2::Repository;

use crate::error::GitError;

/// Facts about the repository the tool was started in.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    /// Root of the work tree; all git commands and file reads run here.
    pub workdir: PathBuf,
    /// Checked-out branch, `None` on a detached HEAD or unborn branch.
    pub current_branch: Option<String>,
}

/// Find the repository containing `start` and read its work tree and branch.
pub fn discover_repo(start: &Path) -> Result<RepoInfo, GitError> {
    let repo = Repository::discover(start).map_err(GitError::NotARepository)?;

    let workdir = repo
        .workdir()
        .ok_or(GitError::BareRepository)?
        .to_path_buf();

    Ok(RepoInfo {
        workdir,
        current_branch: current_branch(&repo),
    })
}

fn current_branch(repo: &Repository) -> Option<String> {
    let head = repo.head().ok()?;
    if !head.is_branch() {
        return None;
    }
    head.shorthand().map(String::from)
}
