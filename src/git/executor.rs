//! Status and diff queries against the system `git` binary.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::GitError;

/// Source of status and diff text for a working directory.
///
/// This abstraction allows replacing the `git` subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Porcelain status report.
    async fn status(&self) -> Result<String, GitError>;

    /// Unified diff of one staged path.
    async fn diff(&self, path: &str) -> Result<String, GitError>;
}

/// [`VersionControl`] backed by `git` subprocesses scoped to a working directory.
pub struct GitCli {
    workdir: PathBuf,
    timeout: Duration,
}

impl GitCli {
    pub fn new(workdir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            workdir: workdir.into(),
            timeout,
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Run git with `args` and return stdout without trailing whitespace.
    ///
    /// Leading whitespace is significant in porcelain output (` M path`).
    async fn run_git(&self, args: &[&str], operation: &str) -> Result<String, GitError> {
        let output = timeout(
            self.timeout,
            Command::new("git")
                .args(args)
                .current_dir(&self.workdir)
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .output(),
        )
        .await
        .map_err(|_| GitError::Timeout {
            operation: operation.to_string(),
            secs: self.timeout.as_secs(),
        })?
        .map_err(GitError::SpawnFailed)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(GitError::NonZeroExit {
                operation: operation.to_string(),
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim_end().to_string())
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn status(&self) -> Result<String, GitError> {
        let raw = self
            .run_git(&["-c", "core.quotePath=false", "status", "--porcelain", "-z"], "status")
            .await?;
        Ok(porcelain_records_to_lines(&raw))
    }

    async fn diff(&self, path: &str) -> Result<String, GitError> {
        self.run_git(
            &[
                "--literal-pathspecs",
                "diff",
                "--cached",
                "--no-color",
                "--no-ext-diff",
                "--",
                path,
            ],
            "diff",
        )
        .await
    }
}

/// Convert `status --porcelain -z` output into newline-separated lines.
///
/// NUL-terminated records carry paths verbatim (no C-style quoting). Rename
/// and copy records are followed by an extra record holding the source path,
/// which has no status code and is skipped.
fn porcelain_records_to_lines(raw: &str) -> String {
    let mut lines = Vec::new();
    let mut records = raw.split('\0').filter(|record| !record.is_empty());

    while let Some(record) = records.next() {
        let code = record.get(..2).unwrap_or_default();
        if code.contains(['R', 'C']) {
            records.next();
        }
        lines.push(record);
    }

    lines.join("\n")
}

/// Check that `git` is installed and runnable.
pub async fn check_git_installed() -> Result<(), GitError> {
    if which::which("git").is_err() {
        return Err(GitError::NotInstalled);
    }

    let version_check = Command::new("git")
        .arg("--version")
        .output()
        .await
        .map_err(GitError::SpawnFailed)?;

    if !version_check.status.success() {
        return Err(GitError::NotInstalled);
    }

    Ok(())
}
