//! commitsmith - generates commit messages for pending working-tree changes.
//!
//! # Overview
//!
//! commitsmith reads `git status --porcelain`, classifies the changes, builds
//! a deterministic emoji-tagged title from the most significant files and asks
//! a Gemini model for a short explanation of the staged diffs. Every failure
//! past repository discovery degrades into a fallback message, so a commit can
//! always be made.

pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;

// Re-export commonly used types
pub use commit::{ChangeSet, CommitMessage, ComposeMode, Notice, Outcome, generate_commit_message};
pub use config::{Config, Credential};
pub use error::{CommitError, GenerationError, GitError, PipelineError};
