//! Unified diff parsing into compact per-file change summaries.

use std::fmt;

/// Rendered in place of an empty summary so downstream text is never blank.
pub const NO_CHANGES_SENTINEL: &str = "no changes detected";

/// Placeholder for a file whose diff could not be fetched.
pub const DIFF_UNAVAILABLE: &str = "diff unavailable";

/// Maximum summary entries surfaced per file in the explanation prompt.
pub const PROMPT_ENTRY_LIMIT: usize = 5;

/// Metadata headers that never count as content.
const METADATA_PREFIXES: [&str; 4] = ["diff --git", "index", "+++", "---"];

/// One added or removed content line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    Added(String),
    Removed(String),
}

impl fmt::Display for DiffLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffLine::Added(content) => write!(f, "added: {content}"),
            DiffLine::Removed(content) => write!(f, "removed: {content}"),
        }
    }
}

/// Compact summary of one file's diff.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub entries: Vec<DiffLine>,
    pub lines_added: usize,
    pub lines_removed: usize,
}

impl DiffSummary {
    pub fn has_changes(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Render at most `limit` entries, one per line, or the sentinel when
    /// there are none.
    pub fn render(&self, limit: usize) -> String {
        if !self.has_changes() {
            return NO_CHANGES_SENTINEL.to_string();
        }

        self.entries
            .iter()
            .take(limit)
            .map(|line| format!("- {line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `+N/-M` tally.
    pub fn tally(&self) -> String {
        format!("+{}/-{}", self.lines_added, self.lines_removed)
    }
}

/// Raw diff text for a file, or a marker that fetching it failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffText {
    Available(String),
    Unavailable,
}

/// A modified file paired with its fetched diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: String,
    pub diff: DiffText,
}

impl FileDiff {
    pub fn available(path: impl Into<String>, diff: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            diff: DiffText::Available(diff.into()),
        }
    }

    pub fn unavailable(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            diff: DiffText::Unavailable,
        }
    }

    /// Summarize the diff; `None` when it could not be fetched.
    pub fn summary(&self) -> Option<DiffSummary> {
        match &self.diff {
            DiffText::Available(text) => Some(summarize_diff(text)),
            DiffText::Unavailable => None,
        }
    }

    /// The raw diff text, or the unavailable placeholder.
    pub fn raw_text(&self) -> &str {
        match &self.diff {
            DiffText::Available(text) => text,
            DiffText::Unavailable => DIFF_UNAVAILABLE,
        }
    }
}

/// Summarize unified diff text for a single file.
///
/// Metadata headers are skipped. Lines starting with `+` or `-` become
/// entries with the marker stripped and content trimmed. Context lines,
/// hunk headers and `\ No newline` markers are ignored.
pub fn summarize_diff(text: &str) -> DiffSummary {
    let mut summary = DiffSummary::default();

    for line in text.lines() {
        if METADATA_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) {
            continue;
        }

        if let Some(content) = line.strip_prefix('+') {
            summary.entries.push(DiffLine::Added(content.trim().to_string()));
            summary.lines_added += 1;
        } else if let Some(content) = line.strip_prefix('-') {
            summary.entries.push(DiffLine::Removed(content.trim().to_string()));
            summary.lines_removed += 1;
        }
    }

    summary
}
