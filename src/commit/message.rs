//! Final message composition and git staging/commit.

use std::fmt;
use std::str::FromStr;

use git2::{IndexAddOption, Oid, Repository};
use tracing::debug;

use crate::commit::diff::FileDiff;
use crate::commit::title::{MAX_TITLE_CHARS, truncate_chars};
use crate::error::{CommitError, GenerationError};

/// Maximum characters of explanation kept in narrative mode.
pub const MAX_EXPLANATION_CHARS: usize = 1000;

/// Title used when the pipeline cannot produce a real one.
pub const FALLBACK_TITLE: &str = "Project update";

/// Body used alongside [`FALLBACK_TITLE`].
pub const FALLBACK_BODY: &str = "Automated commit of project changes.";

/// Body used when the explanation could not be generated.
pub const APOLOGY_BODY: &str = "Unable to generate a detailed explanation for these changes.";

/// How the detailed body is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeMode {
    /// The generated explanation, truncated.
    #[default]
    Narrative,
    /// One fenced diff block per modified file, explanation prepended.
    Evidence,
}

impl ComposeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComposeMode::Narrative => "narrative",
            ComposeMode::Evidence => "evidence",
        }
    }
}

impl fmt::Display for ComposeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComposeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "narrative" => Ok(Self::Narrative),
            "evidence" => Ok(Self::Evidence),
            other => Err(format!("Unknown compose mode: {other}")),
        }
    }
}

/// A two-part commit message.
///
/// The title is at most [`MAX_TITLE_CHARS`] characters and neither part is
/// blank once constructed through this module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage {
    short_message: String,
    detailed_message: String,
}

impl CommitMessage {
    /// Build a message, enforcing the title limit and non-blank parts.
    pub fn new(short_message: &str, detailed_message: &str) -> Self {
        let short = truncate_chars(short_message.trim(), MAX_TITLE_CHARS);
        let detailed = detailed_message.trim();

        Self {
            short_message: if short.trim().is_empty() {
                FALLBACK_TITLE.to_string()
            } else {
                short
            },
            detailed_message: if detailed.is_empty() {
                APOLOGY_BODY.to_string()
            } else {
                detailed.to_string()
            },
        }
    }

    /// The fixed default used when anything upstream fails.
    pub fn fallback() -> Self {
        Self {
            short_message: FALLBACK_TITLE.to_string(),
            detailed_message: FALLBACK_BODY.to_string(),
        }
    }

    pub fn short_message(&self) -> &str {
        &self.short_message
    }

    pub fn detailed_message(&self) -> &str {
        &self.detailed_message
    }

    /// Format for git: title, blank line, body.
    pub fn format(&self) -> String {
        format!("{}\n\n{}", self.short_message, self.detailed_message)
    }
}

/// Merge the title, the explanation result and the per-file diffs.
///
/// A failed or empty explanation degrades instead of propagating: narrative
/// mode falls back to [`APOLOGY_BODY`], evidence mode to the diff blocks
/// alone.
pub fn compose_message(
    title: &str,
    explanation: Result<String, GenerationError>,
    diffs: &[FileDiff],
    mode: ComposeMode,
) -> CommitMessage {
    let explanation = match explanation {
        Ok(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Ok(_) => {
            debug!("Explanation was empty; using {mode} fallback");
            None
        }
        Err(e) => {
            debug!("Explanation unavailable ({e}); using {mode} fallback");
            None
        }
    };

    let body = match mode {
        ComposeMode::Narrative => explanation
            .map(|text| truncate_chars(&text, MAX_EXPLANATION_CHARS))
            .unwrap_or_else(|| APOLOGY_BODY.to_string()),
        ComposeMode::Evidence => {
            let mut sections = Vec::new();
            if let Some(text) = explanation {
                sections.push(text);
            }
            sections.extend(diffs.iter().map(render_diff_block));
            sections.join("\n\n")
        }
    };

    CommitMessage::new(title, &body)
}

/// One fenced block holding a file's raw diff, headed by its `+N/-M` tally
/// when the diff was fetched.
fn render_diff_block(file: &FileDiff) -> String {
    let header = match file.summary() {
        Some(summary) => format!("{} ({})", file.path, summary.tally()),
        None => file.path.clone(),
    };
    format!("{header}:\n```diff\n{}\n```", file.raw_text().trim_end())
}

/// Stage all pending changes, like `git add -A` (additions, edits and
/// deletions).
pub fn stage_all(repo: &Repository) -> Result<(), CommitError> {
    let mut index = repo.index().map_err(CommitError::StagingFailed)?;
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .map_err(CommitError::StagingFailed)?;
    index
        .update_all(["*"].iter(), None)
        .map_err(CommitError::StagingFailed)?;
    index.write().map_err(CommitError::StagingFailed)
}

/// The index as it stood before staging, kept as a tree object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSnapshot(Oid);

impl IndexSnapshot {
    /// Record the current index. Fails while merge conflicts are unresolved.
    pub fn capture(repo: &Repository) -> Result<Self, CommitError> {
        let mut index = repo.index().map_err(CommitError::StagingFailed)?;
        index
            .write_tree()
            .map(IndexSnapshot)
            .map_err(CommitError::StagingFailed)
    }

    /// Put the index back to the recorded state. The working tree is untouched.
    pub fn restore(&self, repo: &Repository) -> Result<(), CommitError> {
        let tree = repo.find_tree(self.0).map_err(CommitError::StagingFailed)?;
        let mut index = repo.index().map_err(CommitError::StagingFailed)?;
        index.read_tree(&tree).map_err(CommitError::StagingFailed)?;
        index.write().map_err(CommitError::StagingFailed)
    }
}

/// Commit the current index on HEAD. An unborn HEAD produces a root commit.
pub fn commit_staged(repo: &Repository, message: &CommitMessage) -> Result<Oid, CommitError> {
    let mut index = repo.index().map_err(CommitError::StagingFailed)?;
    let tree_id = index.write_tree().map_err(CommitError::StagingFailed)?;
    let tree = repo.find_tree(tree_id).map_err(CommitError::CommitFailed)?;

    let sig = repo.signature().map_err(CommitError::ConfigError)?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit().map_err(CommitError::CommitFailed)?),
        Err(e)
            if e.code() == git2::ErrorCode::UnbornBranch
                || e.code() == git2::ErrorCode::NotFound =>
        {
            None
        }
        Err(e) => return Err(CommitError::CommitFailed(e)),
    };
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, &message.format(), &tree, &parents)
        .map_err(CommitError::CommitFailed)
}
