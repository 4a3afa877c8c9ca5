//! Environment-derived configuration.
//!
//! Values are read once at startup and passed explicitly into the pipeline.

use std::env;

use crate::error::ConfigError;

pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";
pub const GITHUB_TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";
pub const GITHUB_REF_ENV_VAR: &str = "GITHUB_REF";
pub const MODEL_ENV_VAR: &str = "GEMINI_MODEL";
pub const API_BASE_ENV_VAR: &str = "GEMINI_API_BASE";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Settings loaded from the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    /// Provided by GitHub Actions. Pushing relies on the checkout's credential
    /// helper, so the token is carried but not sent anywhere by this tool.
    pub github_token: Option<String>,
    pub git_ref: Option<String>,
    pub model: String,
    pub api_base: String,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_ENV_VAR).ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            api_key,
            github_token: get(GITHUB_TOKEN_ENV_VAR),
            git_ref: get(GITHUB_REF_ENV_VAR),
            model: get(MODEL_ENV_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: get(API_BASE_ENV_VAR).unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }

    /// Branch derived from `GITHUB_REF`, if set.
    pub fn ref_branch(&self) -> Option<String> {
        self.git_ref.as_deref().and_then(branch_from_ref)
    }
}

/// Take the last path segment of a ref string.
///
/// `refs/heads/main` → `main`, `refs/heads/release/v2` → `v2`.
pub fn branch_from_ref(git_ref: &str) -> Option<String> {
    git_ref
        .trim()
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Pick the branch to push to.
///
/// Order: explicit override, then `GITHUB_REF`, then the checked-out branch.
pub fn resolve_branch(
    explicit: Option<&str>,
    config: &Config,
    checked_out: Option<String>,
) -> Result<String, ConfigError> {
    if let Some(branch) = explicit.filter(|b| !b.trim().is_empty()) {
        return Ok(branch.trim().to_string());
    }

    config
        .ref_branch()
        .or(checked_out)
        .ok_or(ConfigError::MissingBranch)
}
