//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use git2::Repository;

use commitsmith::error::{GenerationError, GitError};
use commitsmith::git::VersionControl;
use commitsmith::llm::TextGenerator;

/// A test git repository with a committer identity configured.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    /// Create a new empty git repository in a temp directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open repo config");
            config
                .set_str("user.name", "Test User")
                .expect("Failed to set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Failed to set user.email");
        }
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&path, content).expect("Failed to write test file");
    }

    pub fn remove_file(&self, relative: &str) {
        std::fs::remove_file(self.dir.path().join(relative)).expect("Failed to remove test file");
    }

    /// Stage everything and commit it.
    pub fn commit_all(&self, message: &str) {
        let msg = commitsmith::CommitMessage::new(message, message);
        commitsmith::commit::stage_all(&self.repo).expect("Failed to stage");
        commitsmith::commit::commit_staged(&self.repo, &msg).expect("Failed to commit");
    }

    pub fn head_message(&self) -> String {
        let head = self.repo.head().expect("No HEAD");
        let commit = head.peel_to_commit().expect("HEAD is not a commit");
        commit.message().unwrap_or_default().to_string()
    }
}

/// Version-control fake with a fixed status report and per-path diffs.
///
/// Paths without a scripted diff fail with a non-zero exit.
pub struct ScriptedVcs {
    status: Result<String, String>,
    diffs: HashMap<String, String>,
    diff_calls: Mutex<Vec<String>>,
}

impl ScriptedVcs {
    pub fn with_status(report: &str) -> Self {
        Self {
            status: Ok(report.to_string()),
            diffs: HashMap::new(),
            diff_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_status(stderr: &str) -> Self {
        Self {
            status: Err(stderr.to_string()),
            diffs: HashMap::new(),
            diff_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn diff(mut self, path: &str, text: &str) -> Self {
        self.diffs.insert(path.to_string(), text.to_string());
        self
    }

    /// Paths passed to `diff`, in call order.
    pub fn diff_calls(&self) -> Vec<String> {
        self.diff_calls.lock().expect("poisoned").clone()
    }
}

#[async_trait]
impl VersionControl for ScriptedVcs {
    async fn status(&self) -> Result<String, GitError> {
        self.status.clone().map_err(|stderr| GitError::NonZeroExit {
            operation: "status".to_string(),
            code: 128,
            stderr,
        })
    }

    async fn diff(&self, path: &str) -> Result<String, GitError> {
        self.diff_calls.lock().expect("poisoned").push(path.to_string());
        self.diffs
            .get(path)
            .cloned()
            .ok_or_else(|| GitError::NonZeroExit {
                operation: "diff".to_string(),
                code: 128,
                stderr: format!("fatal: bad revision for {path}"),
            })
    }
}

/// Text generator fake that records prompts and replies with a fixed result.
pub struct ScriptedGenerator {
    reply: Option<String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with an API error.
    pub fn failing() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("poisoned").clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().expect("poisoned").push(prompt.to_string());
        self.reply.clone().ok_or_else(|| GenerationError::ApiError {
            status: 500,
            body: "internal error".to_string(),
        })
    }
}
