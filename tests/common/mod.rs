//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::Path;

use git2::{Oid, Repository, Signature};
use serde_json::{Value, json};

/// A test git repository builder for integration tests.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get the test signature for commits.
    fn signature(&self) -> Signature<'_> {
        Signature::now("Test User", "test@example.com").expect("Failed to create signature")
    }

    /// Write files and commit them along with any removals. Returns the commit OID.
    pub fn commit_changes(&self, writes: &[(&str, &str)], removals: &[&str], message: &str) -> Oid {
        let mut index = self.repo.index().expect("Failed to get index");

        for (path, content) in writes {
            let full = self.dir.path().join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create parent dir");
            }
            std::fs::write(&full, content).expect("Failed to write test file");
            index.add_path(Path::new(path)).expect("Failed to add file");
        }

        for path in removals {
            std::fs::remove_file(self.dir.path().join(path)).expect("Failed to remove file");
            index.remove_path(Path::new(path)).expect("Failed to remove from index");
        }

        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let sig = self.signature();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    /// Write files and commit them.
    pub fn commit_files(&self, files: &[(&str, &str)], message: &str) -> Oid {
        self.commit_changes(files, &[], message)
    }

    /// Name of the checked-out branch.
    pub fn current_branch(&self) -> String {
        self.repo
            .head()
            .ok()
            .and_then(|h| h.shorthand().map(String::from))
            .unwrap_or_else(|| "master".to_string())
    }

    /// Add a bare repository as `origin` and push the current branch to it.
    pub fn add_bare_origin(&self) -> tempfile::TempDir {
        let remote_dir = tempfile::tempdir().expect("Failed to create remote dir");
        Repository::init_bare(remote_dir.path()).expect("Failed to init bare repo");

        self.repo
            .remote(
                "origin",
                remote_dir.path().to_str().expect("Invalid remote path"),
            )
            .expect("Failed to add origin remote");

        let branch = self.current_branch();
        let status = std::process::Command::new("git")
            .args(["push", "origin", &format!("HEAD:refs/heads/{}", branch)])
            .current_dir(self.dir.path())
            .output()
            .expect("Failed to push to origin");
        assert!(status.status.success(), "git push failed in test setup");

        remote_dir
    }

    /// Read a file from the work tree.
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(path))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e))
    }

    /// Message of the HEAD commit.
    pub fn head_message(&self) -> String {
        self.repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map(|c| c.message().unwrap_or_default().trim().to_string())
            .expect("Failed to read HEAD commit")
    }

    /// Paths staged in the index that differ from HEAD.
    pub fn staged_paths(&self) -> Vec<String> {
        let head_tree = self.repo.head().and_then(|h| h.peel_to_tree()).ok();
        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), None, None)
            .expect("Failed to diff index");
        diff.deltas()
            .filter_map(|d| d.new_file().path().map(|p| p.to_string_lossy().to_string()))
            .collect()
    }
}

/// Commit message at the tip of `branch` in a bare repository.
pub fn remote_head_message(remote: &Path, branch: &str) -> String {
    let repo = Repository::open_bare(remote).expect("Failed to open bare repo");
    let reference = format!("refs/heads/{}", branch);
    let commit = repo
        .find_reference(&reference)
        .and_then(|r| r.peel_to_commit())
        .expect("Failed to find remote branch");
    commit.message().unwrap_or_default().trim().to_string()
}

/// A successful `generateContent` response body carrying `text`.
pub fn gemini_text_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {
                "parts": [{"text": text}],
                "role": "model"
            },
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": {
            "promptTokenCount": 42,
            "candidatesTokenCount": 17,
            "totalTokenCount": 59
        },
        "modelVersion": "gemini-2.0-flash"
    })
}
