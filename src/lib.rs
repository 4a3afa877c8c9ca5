//! mdreformat - Reformat changed Markdown files with Gemini and push the result.
//!
//! # Overview
//!
//! mdreformat runs in CI after a push. It finds the Markdown files changed by
//! the latest commit, asks Gemini to reformat the changed sections in
//! GitBook style, writes back whatever the model changed, and commits and
//! pushes the result to the originating branch.

pub mod config;
pub mod error;
pub mod gemini;
pub mod git;
pub mod reformat;

// Re-export commonly used types
pub use config::Config;
pub use error::{ConfigError, GeminiError, GitError, ReformatError};
pub use gemini::{GeminiClient, TextGenerator};
pub use git::{CommitIdentity, CommitOutcome, GitCli, VersionControl};
pub use reformat::{FileOutcome, ReformatConfig, RunOutcome, RunSummary, run_reformat};
