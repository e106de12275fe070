//! Version-control collaborators: subprocess queries and repository discovery.

pub mod executor;
pub mod repo;

pub use executor::{GitCli, VersionControl, check_git_installed};
pub use repo::{Workspace, discover};
