//! Per-file and per-run results of the reformat pipeline.

use std::fmt;

/// What happened to one changed Markdown file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Overwritten with the model's output and staged.
    Reformatted,
    /// Would have been overwritten, but this is a dry run.
    WouldReformat,
    /// Model output was empty or matched the original.
    Unchanged,
    /// Deleted in the commit; nothing to reformat.
    Missing,
    /// Skipped after a recoverable error.
    Failed { reason: String },
}

impl FileOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileOutcome::Reformatted => "reformatted",
            FileOutcome::WouldReformat => "would reformat",
            FileOutcome::Unchanged => "unchanged",
            FileOutcome::Missing => "missing",
            FileOutcome::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOutcome::Failed { reason } => write!(f, "failed ({})", reason),
            other => f.write_str(other.as_str()),
        }
    }
}

/// Outcomes for every processed file, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files: Vec<(String, FileOutcome)>,
}

impl RunSummary {
    pub fn record(&mut self, path: impl Into<String>, outcome: FileOutcome) {
        self.files.push((path.into(), outcome));
    }

    pub fn outcome_for(&self, path: &str) -> Option<&FileOutcome> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, outcome)| outcome)
    }

    /// Paths that were written and staged.
    pub fn staged(&self) -> Vec<&str> {
        self.files
            .iter()
            .filter(|(_, outcome)| *outcome == FileOutcome::Reformatted)
            .map(|(path, _)| path.as_str())
            .collect()
    }

    pub fn count(&self, kind: fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|(_, outcome)| kind(outcome)).count()
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    /// One-line summary for the end of a run.
    pub fn describe(&self) -> String {
        let reformatted = self.count(|o| {
            matches!(o, FileOutcome::Reformatted | FileOutcome::WouldReformat)
        });
        let unchanged = self.count(|o| *o == FileOutcome::Unchanged);
        let missing = self.count(|o| *o == FileOutcome::Missing);
        let failed = self.failed_count();

        let mut parts = vec![
            format!("{} reformatted", reformatted),
            format!("{} unchanged", unchanged),
        ];
        if missing > 0 {
            parts.push(format!("{} deleted", missing));
        }
        if failed > 0 {
            parts.push(format!("{} failed", failed));
        }

        format!("{} file(s): {}", self.files.len(), parts.join(", "))
    }
}

/// Terminal state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// No Markdown paths changed between the compared revisions.
    NoMarkdownChanges,
    /// Files were processed but no commit was made.
    NothingToCommit(RunSummary),
    /// Dry run finished; nothing was written.
    DryRun(RunSummary),
    /// A commit was created and pushed.
    Pushed {
        summary: RunSummary,
        remote: String,
        branch: String,
    },
}

impl RunOutcome {
    pub fn summary(&self) -> Option<&RunSummary> {
        match self {
            RunOutcome::NoMarkdownChanges => None,
            RunOutcome::NothingToCommit(summary) | RunOutcome::DryRun(summary) => Some(summary),
            RunOutcome::Pushed { summary, .. } => Some(summary),
        }
    }
}
