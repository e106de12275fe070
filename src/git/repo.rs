//! Workspace and repository discovery.

use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::debug;

use crate::error::PipelineError;

/// An opened repository together with its working directory.
pub struct Workspace {
    pub repo: Repository,
    pub workdir: PathBuf,
}

/// Locate the repository containing `path`.
///
/// Fails with [`PipelineError::NoWorkspace`] when `path` is not a directory
/// and [`PipelineError::NoRepository`] when no repository encloses it or the
/// repository is bare.
pub fn discover(path: &Path) -> Result<Workspace, PipelineError> {
    if !path.is_dir() {
        return Err(PipelineError::NoWorkspace(path.display().to_string()));
    }

    let repo = Repository::discover(path).map_err(|e| {
        debug!("Repository discovery failed for {}: {}", path.display(), e);
        PipelineError::NoRepository(path.display().to_string())
    })?;

    let workdir = repo
        .workdir()
        .map(Path::to_path_buf)
        .ok_or_else(|| PipelineError::NoRepository(path.display().to_string()))?;

    Ok(Workspace { repo, workdir })
}
