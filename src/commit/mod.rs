//! Commit-message synthesis from working-tree changes.

pub mod diff;
pub mod message;
pub mod pipeline;
pub mod prompt;
pub mod rank;
pub mod status;
pub mod title;

pub use diff::{DiffLine, DiffSummary, DiffText, FileDiff, summarize_diff};
pub use message::{
    CommitMessage, ComposeMode, IndexSnapshot, commit_staged, compose_message, stage_all,
};
pub use pipeline::{Notice, Outcome, generate_commit_message};
pub use prompt::build_explanation_prompt;
pub use rank::{RankedFile, rank_significant};
pub use status::{ChangeKind, ChangeSet, FileChange, classify_status};
pub use title::{Category, compose_title};
