//! Prompt construction for the natural-language change explanation.

use std::sync::LazyLock;

use regex_lite::Regex;

use crate::commit::diff::{DIFF_UNAVAILABLE, DiffLine, DiffSummary, FileDiff, PROMPT_ENTRY_LIMIT};
use crate::commit::status::ChangeSet;
use crate::commit::title::truncate_chars;

/// Longest content line kept per summary entry, in characters.
pub const MAX_ENTRY_CHARS: usize = 200;

static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("valid ANSI pattern"));

static CONTROL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\x00-\x08\x0b-\x1f\x7f]").expect("valid control pattern"));

/// Build the prompt sent to the text-generation collaborator.
///
/// One `File:` block per modified file, in the given order, wrapped in fixed
/// instructions. Each block shows at most [`PROMPT_ENTRY_LIMIT`] summary
/// entries. Added and deleted paths from `changes` are listed by name only.
/// Pure string assembly; nothing is sent from here.
pub fn build_explanation_prompt(files: &[FileDiff], changes: &ChangeSet) -> String {
    let blocks = files
        .iter()
        .map(|file| {
            let rendered = match file.summary() {
                Some(summary) => render_sanitized(&summary),
                None => DIFF_UNAVAILABLE.to_string(),
            };
            format!("File: {}\nChanges:\n{}", sanitize_text(&file.path), rendered)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    let other_files = changes
        .added()
        .iter()
        .map(|path| format!("- added: {}", sanitize_text(path)))
        .chain(
            changes
                .deleted()
                .iter()
                .map(|path| format!("- removed: {}", sanitize_text(path))),
        )
        .collect::<Vec<_>>();
    let other_section = if other_files.is_empty() {
        String::new()
    } else {
        format!("\n\n## Other Changed Files\n{}", other_files.join("\n"))
    };

    format!(
        r#"You are writing the body of a Git commit message for the changes below.

## Instructions
- Explain the purpose of the changes, not just what lines moved
- Be concise: a short paragraph or a few bullet points
- Use precise technical language
- Group related changes together instead of listing every file separately
- Do not repeat the file names as a list; the title already carries them

## Changes
{blocks}{other_section}

Respond with only the explanation text, no preamble and no markdown headings."#
    )
}

/// Render a summary with each content line sanitized and capped at
/// [`MAX_ENTRY_CHARS`].
fn render_sanitized(summary: &DiffSummary) -> String {
    let cleaned = DiffSummary {
        entries: summary
            .entries
            .iter()
            .take(PROMPT_ENTRY_LIMIT)
            .map(|line| match line {
                DiffLine::Added(content) => DiffLine::Added(clip_entry(content)),
                DiffLine::Removed(content) => DiffLine::Removed(clip_entry(content)),
            })
            .collect(),
        lines_added: summary.lines_added,
        lines_removed: summary.lines_removed,
    };
    cleaned.render(PROMPT_ENTRY_LIMIT)
}

fn clip_entry(content: &str) -> String {
    let cleaned = sanitize_text(content);
    if cleaned.chars().count() > MAX_ENTRY_CHARS {
        format!("{}...", truncate_chars(&cleaned, MAX_ENTRY_CHARS))
    } else {
        cleaned
    }
}

/// Strip ANSI escape sequences and control characters (newlines and tabs
/// survive).
pub fn sanitize_text(text: &str) -> String {
    let without_ansi = ANSI_ESCAPE.replace_all(text, "");
    CONTROL_CHARS.replace_all(&without_ansi, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commit::status::classify_status;

    #[test]
    fn test_prompt_contains_file_blocks_in_order() {
        let files = vec![
            FileDiff::available("src/b.rs", "+fn b() {}\n"),
            FileDiff::available("src/a.rs", "-fn a() {}\n"),
        ];
        let prompt = build_explanation_prompt(&files, &ChangeSet::default());

        assert!(prompt.contains("File: src/b.rs\nChanges:\n- added: fn b() {}"));
        assert!(prompt.contains("File: src/a.rs\nChanges:\n- removed: fn a() {}"));
        let b = prompt.find("File: src/b.rs").unwrap();
        let a = prompt.find("File: src/a.rs").unwrap();
        assert!(b < a);
    }

    #[test]
    fn test_blocks_separated_by_blank_line() {
        let files = vec![
            FileDiff::available("one.rs", "+1\n"),
            FileDiff::available("two.rs", "+2\n"),
        ];
        let prompt = build_explanation_prompt(&files, &ChangeSet::default());
        assert!(prompt.contains("- added: 1\n\nFile: two.rs"));
    }

    #[test]
    fn test_prompt_framing() {
        let prompt = build_explanation_prompt(&[FileDiff::available("f.rs", "+x\n")], &ChangeSet::default());
        assert!(prompt.contains("purpose"));
        assert!(prompt.contains("concise"));
        assert!(prompt.contains("technical language"));
        assert!(prompt.contains("Group related changes"));
    }

    #[test]
    fn test_prompt_limits_entries_per_file() {
        let diff: String = (0..9).map(|i| format!("+entry {i}\n")).collect();
        let prompt = build_explanation_prompt(&[FileDiff::available("big.rs", diff)], &ChangeSet::default());
        assert!(prompt.contains("entry 4"));
        assert!(!prompt.contains("entry 5"));
    }

    #[test]
    fn test_prompt_uses_sentinel_and_placeholder() {
        let files = vec![
            FileDiff::available("empty.rs", ""),
            FileDiff::unavailable("broken.rs"),
        ];
        let prompt = build_explanation_prompt(&files, &ChangeSet::default());
        assert!(prompt.contains("File: empty.rs\nChanges:\nno changes detected"));
        assert!(prompt.contains("File: broken.rs\nChanges:\ndiff unavailable"));
    }

    #[test]
    fn test_sanitize_text_removes_ansi_and_control() {
        let text = "\x1b[31mred\x1b[0m\x07 bell\tkept";
        assert_eq!(sanitize_text(text), "red bell\tkept");
    }

    #[test]
    fn test_prompt_sanitizes_content() {
        let prompt = build_explanation_prompt(&[FileDiff::available(
            "f.rs",
            "+\x1b[32mgreen\x1b[0m\n",
        )], &ChangeSet::default());
        assert!(!prompt.contains('\x1b'));
        assert!(prompt.contains("- added: green"));
    }

    #[test]
    fn test_prompt_caps_long_entries() {
        let minified = format!("+{}\n-short\n", "x".repeat(50_000));
        let prompt =
            build_explanation_prompt(&[FileDiff::available("bundle.min.js", minified)], &ChangeSet::default());

        let expected = format!("- added: {}...\n", "x".repeat(MAX_ENTRY_CHARS));
        assert!(prompt.contains(&expected));
        assert!(!prompt.contains(&"x".repeat(MAX_ENTRY_CHARS + 1)));
        assert!(prompt.contains("- removed: short"));
        assert!(prompt.len() < 2_000);
    }

    #[test]
    fn test_prompt_lists_added_and_deleted_files() {
        let changes = classify_status("A  src/new.rs\nM  src/lib.rs\nD  src/old.rs");
        let prompt = build_explanation_prompt(&[FileDiff::available("src/lib.rs", "+x\n")], &changes);
        assert!(prompt.contains("## Other Changed Files\n- added: src/new.rs\n- removed: src/old.rs"));
        assert!(!prompt.contains("- added: src/lib.rs"));
    }

    #[test]
    fn test_prompt_omits_other_section_when_only_modified() {
        let changes = classify_status("M  src/lib.rs");
        let prompt = build_explanation_prompt(&[FileDiff::available("src/lib.rs", "+x\n")], &changes);
        assert!(!prompt.contains("Other Changed Files"));
    }
}
