//! Error types for mdreformat modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error(
        "Could not determine the branch to push to. Set GITHUB_REF, pass --branch, or check out a branch."
    )]
    MissingBranch,
}

/// Errors from git operations.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git not found on PATH. Install git and try again.")]
    NotInstalled,

    #[error("Not a git repository: {0}")]
    NotARepository(#[source] git2::Error),

    #[error("Bare repository not supported")]
    BareRepository,

    #[error("Failed to spawn git {operation}: {source}")]
    SpawnFailed {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {operation} exited with code {code}: {stderr}")]
    NonZeroExit {
        operation: String,
        code: i32,
        stderr: String,
    },
}

impl GitError {
    /// Captured stderr for failures that reached git itself.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            GitError::NonZeroExit { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

/// Errors from the Gemini generation API.
#[derive(Error, Debug)]
pub enum GeminiError {
    #[error("Gemini request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Gemini API returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Gemini returned an unexpected response: {0}")]
    MalformedResponse(String),
}

/// Fatal errors from the reformat pipeline.
///
/// Per-file failures never surface here; they are recorded in the run summary.
#[derive(Error, Debug)]
pub enum ReformatError {
    #[error(transparent)]
    Git(#[from] GitError),

    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to push to {remote}/{branch}: {stderr}")]
    PushFailed {
        remote: String,
        branch: String,
        stderr: String,
    },
}
