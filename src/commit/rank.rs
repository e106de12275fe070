//! Noise filtering and significance ranking of changed files.

use std::path::Path;

use crate::commit::status::{ChangeKind, FileChange};

/// Maximum number of files shown in a commit title.
pub const MAX_RANKED_FILES: usize = 3;

/// Path substrings that mark dependency caches, lock files and logs.
const NOISE_MARKERS: [&str; 3] = ["node_modules/", ".lock", ".log"];

/// Extensions (and dotfile names) ranked ahead of everything else.
const PRIORITY_EXTENSIONS: [&str; 14] = [
    ".gitignore", ".rs", ".py", ".js", ".ts", ".jsx", ".tsx", ".html", ".css", ".json", ".yml",
    ".yaml", ".toml", ".md",
];

/// A changed file selected for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedFile {
    /// Base name, directory stripped.
    pub name: String,
    pub kind: ChangeKind,
}

/// Whether a path is dependency, lock or log noise.
pub fn is_noise(path: &str) -> bool {
    NOISE_MARKERS.iter().any(|marker| path.contains(marker))
}

/// Whether a path carries one of the priority extensions.
pub fn has_priority_extension(path: &str) -> bool {
    let lower = path.to_lowercase();
    PRIORITY_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Pick the most significant changed files, most significant first.
///
/// Noise paths are dropped. Priority-extension files sort before the rest;
/// within each group shorter paths come first. The sort is stable, so
/// equal-length paths keep their input order.
pub fn rank_significant(changes: &[FileChange]) -> Vec<RankedFile> {
    let mut candidates: Vec<&FileChange> =
        changes.iter().filter(|change| !is_noise(&change.path)).collect();

    candidates.sort_by_key(|change| (!has_priority_extension(&change.path), change.path.len()));

    candidates
        .into_iter()
        .take(MAX_RANKED_FILES)
        .map(|change| RankedFile {
            name: base_name(&change.path),
            kind: change.kind,
        })
        .collect()
}

fn base_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}
