//! Porcelain status parsing into typed change records.

use std::collections::HashSet;
use std::fmt;

/// Offset of the path within a porcelain status line (`XY path`).
const PATH_OFFSET: usize = 3;

/// Kind of change a file underwent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Add,
    Update,
    Remove,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Add => "add",
            ChangeKind::Update => "update",
            ChangeKind::Remove => "remove",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A changed path tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub kind: ChangeKind,
}

/// Classified working-tree changes.
///
/// Each path appears in at most one list. An empty set means there is
/// nothing to commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    added: Vec<String>,
    modified: Vec<String>,
    deleted: Vec<String>,
}

impl ChangeSet {
    pub fn added(&self) -> &[String] {
        &self.added
    }

    pub fn modified(&self) -> &[String] {
        &self.modified
    }

    pub fn deleted(&self) -> &[String] {
        &self.deleted
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len()
    }

    /// Flatten into kind-tagged entries: added, then modified, then deleted.
    pub fn flatten(&self) -> Vec<FileChange> {
        let tagged = |paths: &[String], kind: ChangeKind| {
            paths
                .iter()
                .map(move |path| FileChange {
                    path: path.clone(),
                    kind,
                })
                .collect::<Vec<_>>()
        };

        let mut changes = tagged(&self.added, ChangeKind::Add);
        changes.extend(tagged(&self.modified, ChangeKind::Update));
        changes.extend(tagged(&self.deleted, ChangeKind::Remove));
        changes
    }
}

/// Parse a porcelain status report into a [`ChangeSet`].
///
/// Only the first status column is consulted: `A` -> added, `M` -> modified,
/// `D` -> deleted. Renames, copies, untracked and ignored entries are dropped,
/// as are blank or truncated lines. Never fails.
pub fn classify_status(report: &str) -> ChangeSet {
    let mut set = ChangeSet::default();
    let mut seen = HashSet::new();

    for line in report.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let Some(path) = line.get(PATH_OFFSET..).map(str::trim) else {
            continue;
        };
        if path.is_empty() {
            continue;
        }

        let target = match line.chars().next() {
            Some('A') => &mut set.added,
            Some('M') => &mut set.modified,
            Some('D') => &mut set.deleted,
            _ => continue,
        };

        if seen.insert(path.to_string()) {
            target.push(path.to_string());
        }
    }

    set
}
