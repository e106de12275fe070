//! Deterministic change category and emoji-tagged title.

use std::fmt;

use crate::commit::rank::RankedFile;
use crate::commit::status::{ChangeKind, ChangeSet};

/// Hard limit on the title, in characters.
pub const MAX_TITLE_CHARS: usize = 72;

/// Shown in place of file names when every change was filtered as noise.
const NO_SIGNIFICANT_FILES: &str = "project files";

const IGNORE_PATTERN_EXTENSIONS: [&str; 1] = [".gitignore"];
const SCRIPTING_EXTENSIONS: [&str; 1] = [".py"];
const WEB_EXTENSIONS: [&str; 6] = [".js", ".ts", ".jsx", ".tsx", ".html", ".css"];
const DATA_EXTENSIONS: [&str; 4] = [".json", ".yml", ".yaml", ".toml"];

/// Category label shown after the emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Configuration,
    Enhancement,
    Development,
    Update,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Configuration => "Configuration",
            Category::Enhancement => "Enhancement",
            Category::Development => "Development",
            Category::Update => "Update",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Most frequent change kind.
///
/// Ties go to the kind whose first entry appears earliest in
/// [`ChangeSet::flatten`] order, so on equal counts Add beats Update beats
/// Remove. Returns `None` for an empty set.
pub fn dominant_kind(changes: &ChangeSet) -> Option<ChangeKind> {
    let mut counts: Vec<(ChangeKind, usize)> = Vec::new();
    for change in changes.flatten() {
        match counts.iter_mut().find(|(kind, _)| *kind == change.kind) {
            Some((_, count)) => *count += 1,
            None => counts.push((change.kind, 1)),
        }
    }

    let mut best: Option<(ChangeKind, usize)> = None;
    for (kind, count) in counts {
        if best.is_none_or(|(_, top)| count > top) {
            best = Some((kind, count));
        }
    }
    best.map(|(kind, _)| kind)
}

/// Title emoji for the dominant kind.
pub fn kind_emoji(kind: Option<ChangeKind>) -> &'static str {
    match kind {
        Some(ChangeKind::Add) => "✨",
        Some(ChangeKind::Update) => "🔧",
        Some(ChangeKind::Remove) => "🗑️",
        None => "💡",
    }
}

/// Per-file icon placed before each displayed name.
pub fn file_icon(kind: ChangeKind) -> &'static str {
    match kind {
        ChangeKind::Add => "✨",
        ChangeKind::Update => "📝",
        ChangeKind::Remove => "🗑️",
    }
}

/// Derive the category from the displayed files.
///
/// Rules are checked in order and the first match wins: ignore-pattern
/// files, scripting, web, structured data, then the default.
pub fn derive_category(files: &[RankedFile]) -> Category {
    let any_with = |extensions: &[&str]| {
        files.iter().any(|file| {
            let name = file.name.to_lowercase();
            extensions.iter().any(|ext| name.ends_with(ext))
        })
    };

    if any_with(&IGNORE_PATTERN_EXTENSIONS) {
        Category::Configuration
    } else if any_with(&SCRIPTING_EXTENSIONS) {
        Category::Enhancement
    } else if any_with(&WEB_EXTENSIONS) {
        Category::Development
    } else if any_with(&DATA_EXTENSIONS) {
        Category::Configuration
    } else {
        Category::Update
    }
}

/// Compose `"{emoji} {category}: {files}"`, cut to [`MAX_TITLE_CHARS`].
///
/// The cut is a plain character cut and may split a word or a file name.
pub fn compose_title(changes: &ChangeSet, files: &[RankedFile]) -> String {
    let emoji = kind_emoji(dominant_kind(changes));
    let category = derive_category(files);

    let file_list = if files.is_empty() {
        NO_SIGNIFICANT_FILES.to_string()
    } else {
        files
            .iter()
            .map(|file| format!("{} {}", file_icon(file.kind), file.name))
            .collect::<Vec<_>>()
            .join(", ")
    };

    truncate_chars(&format!("{emoji} {category}: {file_list}"), MAX_TITLE_CHARS)
}

/// Keep at most `limit` characters.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
