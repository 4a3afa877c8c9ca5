//! Reformat pipeline: detect changed Markdown, rewrite it with the model,
//! then commit and push.

pub mod outcome;
pub mod prompt;

use std::borrow::Cow;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{GeminiError, ReformatError};
use crate::gemini::{TextGenerator, strip_enclosing_fence};
use crate::git::{CommitIdentity, CommitOutcome, VersionControl, markdown_paths};

pub use outcome::{FileOutcome, RunOutcome, RunSummary};
pub use prompt::{ReformatInput, build_reformat_prompt};

pub const DEFAULT_BASE: &str = "HEAD^";
pub const DEFAULT_HEAD: &str = "HEAD";
pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_COMMIT_MESSAGE: &str = "chore(docs): reformat Markdown via Gemini AI";

/// Settings for one run, derived from the environment and CLI flags.
#[derive(Debug, Clone)]
pub struct ReformatConfig {
    /// Work tree root. Changed paths are relative to it.
    pub workdir: PathBuf,
    pub base: String,
    pub head: String,
    pub remote: String,
    pub branch: String,
    pub commit_message: String,
    pub identity: CommitIdentity,
    pub dry_run: bool,
}

impl ReformatConfig {
    /// Defaults: compare `HEAD^..HEAD` and push to `origin/<branch>`.
    pub fn new(workdir: impl Into<PathBuf>, branch: impl Into<String>) -> Self {
        Self {
            workdir: workdir.into(),
            base: DEFAULT_BASE.to_string(),
            head: DEFAULT_HEAD.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            branch: branch.into(),
            commit_message: DEFAULT_COMMIT_MESSAGE.to_string(),
            identity: CommitIdentity::default(),
            dry_run: false,
        }
    }
}

/// Run the full pipeline.
pub async fn run_reformat<V, G>(
    vcs: &V,
    generator: &G,
    config: &ReformatConfig,
) -> Result<RunOutcome, ReformatError>
where
    V: VersionControl,
    G: TextGenerator,
{
    // ── Stage 1: Change detection ──
    let changed = detect_changes(vcs, config).await?;

    if changed.is_empty() {
        println!("No Markdown files changed in this commit. Exiting.");
        return Ok(RunOutcome::NoMarkdownChanges);
    }

    println!("Found {} changed Markdown file(s)", changed.len());

    // ── Stage 2: Reformat each file in order ──
    let mut summary = RunSummary::default();
    for path in &changed {
        let outcome = process_file(vcs, generator, config, path).await?;
        report_outcome(path, &outcome);
        summary.record(path.clone(), outcome);
    }

    println!("{}", summary.describe());

    if config.dry_run {
        println!("Dry run complete. No changes made.");
        return Ok(RunOutcome::DryRun(summary));
    }

    if summary.staged().is_empty() {
        println!("No reformat commits to push.");
        return Ok(RunOutcome::NothingToCommit(summary));
    }

    // ── Stage 3: Commit & publish ──
    publish(vcs, config, summary).await
}

/// Changed Markdown paths between the configured revisions.
///
/// Fetching full history is best-effort: a clone that is already complete
/// makes `--unshallow` fail, and that is fine.
pub async fn detect_changes<V: VersionControl>(
    vcs: &V,
    config: &ReformatConfig,
) -> Result<Vec<String>, ReformatError> {
    if let Err(e) = vcs.fetch_full_history().await {
        debug!("Ignoring fetch failure: {}", e);
    }

    let files = vcs.changed_files(&config.base, &config.head).await?;
    debug!(total = files.len(), "files changed between {} and {}", config.base, config.head);

    Ok(markdown_paths(files))
}

/// Reformat a single file.
///
/// Recoverable problems come back as [`FileOutcome::Failed`] or
/// [`FileOutcome::Missing`]; only git and I/O failures that leave the run in
/// an unknown state are returned as errors.
pub async fn process_file<V, G>(
    vcs: &V,
    generator: &G,
    config: &ReformatConfig,
    path: &str,
) -> Result<FileOutcome, ReformatError>
where
    V: VersionControl,
    G: TextGenerator,
{
    let file_path = config.workdir.join(path);

    let original = match std::fs::read_to_string(&file_path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} no longer exists, skipping", path);
            return Ok(FileOutcome::Missing);
        }
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            eprintln!("Warning: {} is not valid UTF-8, skipping", path);
            return Ok(FileOutcome::Failed {
                reason: "not valid UTF-8".to_string(),
            });
        }
        Err(source) => {
            return Err(ReformatError::ReadFailed {
                path: file_path,
                source,
            });
        }
    };

    let diff_text = vcs.diff_for_path(&config.base, &config.head, path).await?;

    let prompt = build_reformat_prompt(&ReformatInput {
        base: &config.base,
        head: &config.head,
        diff_text: &diff_text,
        original_content: &original,
    });

    info!("Reformatting {}", path);

    let generated = match generator.generate(&prompt).await {
        Ok(text) => text,
        Err(GeminiError::Http { status, body }) => {
            eprintln!("Gemini API returned {} for {}:", status, path);
            eprintln!("{}", body);
            return Ok(FileOutcome::Failed {
                reason: format!("HTTP {}", status),
            });
        }
        Err(e) => {
            eprintln!("Gemini request for {} failed: {}", path, e);
            return Ok(FileOutcome::Failed {
                reason: e.to_string(),
            });
        }
    };

    if !should_adopt(&original, &generated) {
        return Ok(FileOutcome::Unchanged);
    }

    // A document that is itself one code block comes back fenced on purpose.
    let candidate = if original.trim_start().starts_with("```") {
        Cow::Borrowed(generated.as_str())
    } else {
        strip_enclosing_fence(&generated)
    };

    if !should_adopt(&original, &candidate) {
        return Ok(FileOutcome::Unchanged);
    }

    if config.dry_run {
        return Ok(FileOutcome::WouldReformat);
    }

    write_atomically(&file_path, &candidate)?;
    vcs.stage(path).await?;

    Ok(FileOutcome::Reformatted)
}

/// Adopt generated content only if it is non-blank and differs from the
/// original once surrounding whitespace is ignored.
///
/// A change that only adds or removes leading/trailing whitespace, such as a
/// final newline, is not adopted.
pub fn should_adopt(original: &str, generated: &str) -> bool {
    let generated = generated.trim();
    !generated.is_empty() && generated != original.trim()
}

/// Replace a file's content via a temp file in the same directory.
///
/// Symlinks are followed: the link stays in place and its target is replaced.
fn write_atomically(path: &Path, content: &str) -> Result<(), ReformatError> {
    let write_failed = |source: io::Error| ReformatError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let is_symlink = std::fs::symlink_metadata(path).is_ok_and(|m| m.file_type().is_symlink());
    let resolved;
    let path = if is_symlink {
        resolved = std::fs::canonicalize(path).map_err(write_failed)?;
        resolved.as_path()
    } else {
        path
    };

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_failed)?;
    tmp.write_all(content.as_bytes()).map_err(write_failed)?;

    // Keep the original mode; temp files are created owner-only.
    if let Ok(metadata) = std::fs::metadata(path) {
        std::fs::set_permissions(tmp.path(), metadata.permissions()).map_err(write_failed)?;
    }

    tmp.persist(path).map_err(|e| write_failed(e.error))?;
    Ok(())
}

fn report_outcome(path: &str, outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Reformatted => println!("✓ Reformatted and staged {}", path),
        FileOutcome::WouldReformat => println!("  [DRY RUN] Would reformat {}", path),
        FileOutcome::Unchanged => println!("No changes needed for {}", path),
        // Deleted files are expected; failures were already reported.
        FileOutcome::Missing | FileOutcome::Failed { .. } => {}
    }
}

/// Commit staged files and push them to the originating branch.
async fn publish<V: VersionControl>(
    vcs: &V,
    config: &ReformatConfig,
    summary: RunSummary,
) -> Result<RunOutcome, ReformatError> {
    vcs.configure_identity(&config.identity).await?;

    match vcs.commit(&config.commit_message).await? {
        CommitOutcome::NothingToCommit => {
            println!("No reformat commits to push.");
            Ok(RunOutcome::NothingToCommit(summary))
        }
        CommitOutcome::Created => {
            info!("Created commit: {}", config.commit_message);

            vcs.push(&config.remote, &config.branch)
                .await
                .map_err(|e| ReformatError::PushFailed {
                    remote: config.remote.clone(),
                    branch: config.branch.clone(),
                    stderr: e.stderr().map(String::from).unwrap_or_else(|| e.to_string()),
                })?;

            println!(
                "Successfully pushed reformatted files to {}/{}.",
                config.remote, config.branch
            );

            Ok(RunOutcome::Pushed {
                summary,
                remote: config.remote.clone(),
                branch: config.branch.clone(),
            })
        }
    }
}
