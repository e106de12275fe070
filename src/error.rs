//! Error types for commitsmith modules using thiserror.

use thiserror::Error;

/// Errors from the version-control collaborator.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("git not found in PATH. Install git and try again.")]
    NotInstalled,

    #[error("Failed to spawn git process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("git {operation} exited with code {code}: {stderr}")]
    NonZeroExit {
        operation: String,
        code: i32,
        stderr: String,
    },

    #[error("git {operation} timed out after {secs} seconds")]
    Timeout { operation: String, secs: u64 },
}

/// Errors from the text-generation collaborator.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("No API credential configured. Set COMMITSMITH_API_KEY or GEMINI_API_KEY.")]
    MissingCredential,

    #[error("Request to text-generation API failed: {0}")]
    RequestFailed(#[source] reqwest::Error),

    #[error("Text-generation API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("Failed to parse text-generation response: {0}")]
    InvalidResponse(String),

    #[error("Text-generation API returned no candidate text")]
    EmptyResponse,

    #[error("Text-generation request timed out after {0} seconds")]
    Timeout(u64),

    #[error("All retry attempts failed: {0}")]
    RetriesExhausted(#[source] Box<GenerationError>),
}

/// Errors from staging and committing.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("Failed to stage changes: {0}")]
    StagingFailed(#[source] git2::Error),

    #[error("Failed to create commit: {0}")]
    CommitFailed(#[source] git2::Error),

    #[error("Git config error (missing user.name or user.email): {0}")]
    ConfigError(#[source] git2::Error),
}

/// Terminal errors from the message pipeline.
///
/// Everything recoverable degrades into a fallback message instead; these are
/// the outcomes the host must report without committing.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No workspace directory: {0}")]
    NoWorkspace(String),

    #[error("No git repository detected in {0}")]
    NoRepository(String),
}
