//! mdreformat - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mdreformat::config::{Config, resolve_branch};
use mdreformat::error::{ConfigError, ReformatError};
use mdreformat::git::{check_git_installed, discover_repo};
use mdreformat::reformat::{
    DEFAULT_BASE, DEFAULT_COMMIT_MESSAGE, DEFAULT_HEAD, DEFAULT_REMOTE, ReformatConfig,
    run_reformat,
};
use mdreformat::{GeminiClient, GitCli};

/// Environment variable holding the tracing filter.
const LOG_ENV_VAR: &str = "MDREFORMAT_LOG";

/// Reformat Markdown files changed in the last commit using Gemini.
#[derive(Parser, Debug)]
#[command(name = "mdreformat")]
#[command(about = "Reformat Markdown files changed in the last commit using Gemini")]
#[command(version)]
struct Cli {
    /// Path inside the repository to operate on
    #[arg(long, default_value = ".")]
    repo: PathBuf,

    /// Revision to diff from
    #[arg(long, default_value = DEFAULT_BASE)]
    base: String,

    /// Revision to diff to
    #[arg(long, default_value = DEFAULT_HEAD)]
    head: String,

    /// Remote to push to
    #[arg(long, default_value = DEFAULT_REMOTE)]
    remote: String,

    /// Branch to push to (overrides GITHUB_REF)
    #[arg(long)]
    branch: Option<String>,

    /// Commit message for the reformat commit
    #[arg(long, default_value = DEFAULT_COMMIT_MESSAGE)]
    commit_message: String,

    /// Dry run - call the model and report, but write nothing
    #[arg(long)]
    dry_run: bool,

    /// Show debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_fatal(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Step 1: Configuration
    let config = Config::from_env()?;

    // Step 2: Preflight
    check_git_installed()?;
    let repo = discover_repo(&cli.repo).context("Run mdreformat from within a git repository")?;

    let branch = resolve_branch(cli.branch.as_deref(), &config, repo.current_branch.clone())?;
    tracing::debug!(workdir = %repo.workdir.display(), %branch, model = %config.model, "starting");

    // Step 3: Reformat, commit, push
    let git = GitCli::new(&repo.workdir);
    let gemini = GeminiClient::from_config(&config);

    let mut reformat_config = ReformatConfig::new(&repo.workdir, branch);
    reformat_config.base = cli.base;
    reformat_config.head = cli.head;
    reformat_config.remote = cli.remote;
    reformat_config.commit_message = cli.commit_message;
    reformat_config.dry_run = cli.dry_run;

    run_reformat(&git, &gemini, &reformat_config).await?;

    Ok(())
}

/// Print a fatal error to stderr with a readable prefix.
fn report_fatal(err: &anyhow::Error) {
    eprintln!("{}", fatal_message(err));
}

/// Diagnostic printed for an error that ends the run.
fn fatal_message(err: &anyhow::Error) -> String {
    if let Some(ReformatError::PushFailed { stderr, .. }) = err.downcast_ref::<ReformatError>() {
        return format!("Failed to push changes:\n{}", stderr);
    }

    if let Some(ConfigError::MissingApiKey) = err.downcast_ref::<ConfigError>() {
        return "Error: GEMINI_API_KEY is not set.".to_string();
    }

    format!("Error: {:#}", err)
}

/// Send tracing output to stderr, filtered by `MDREFORMAT_LOG`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "mdreformat=debug" } else { "mdreformat=warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
