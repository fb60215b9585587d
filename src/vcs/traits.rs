//! vcs::traits
//!
//! Core `Vcs` trait for local repository operations and data transfer.
//!
//! # Design
//!
//! The trait covers exactly the version-control surface a migration
//! needs: clone the source, discard its history, start a fresh
//! repository over the transformed tree, commit everything, and push to
//! the target remote. Operations are synchronous; callers that live in
//! async code invoke them directly since each one is a short local
//! action or a bounded network call.
//!
//! Errors are cloneable value types so test doubles can script them.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from version-control operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VcsError {
    /// Cloning the source repository failed.
    #[error("failed to clone {url}: {message}")]
    CloneFailed {
        /// The clone URL, without credentials.
        url: String,
        /// Description of the failure.
        message: String,
    },

    /// A network transfer failed. Retryable.
    #[error("transfer failed: {message}")]
    Transport {
        /// Description of the failure.
        message: String,
    },

    /// A filesystem operation failed.
    #[error("io error at {path}: {message}")]
    Io {
        /// The path involved.
        path: PathBuf,
        /// Description of the failure.
        message: String,
    },

    /// Internal git error.
    #[error("git error: {message}")]
    Internal {
        /// The error message.
        message: String,
    },
}

/// Trait for version-control operations.
///
/// Implementations must be `Send + Sync` so a single instance can serve
/// a whole batch run.
///
/// # Example
///
/// ```ignore
/// use rebrand::vcs::{Git, Vcs};
///
/// let vcs = Git::with_token(token);
/// vcs.clone_repo("https://github.com/bio-tools/SampleTool.git", &dest)?;
/// vcs.strip_history(&dest)?;
/// ```
pub trait Vcs: Send + Sync {
    /// Clone a repository into `dest`.
    ///
    /// `dest` must not already contain a repository.
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), VcsError>;

    /// Remove all version-control history from a working tree.
    ///
    /// Succeeds if the tree has no history to begin with.
    fn strip_history(&self, repo_path: &Path) -> Result<(), VcsError>;

    /// Initialize a fresh repository over an existing tree.
    fn init(&self, repo_path: &Path) -> Result<(), VcsError>;

    /// Stage every file in the working tree, including deletions.
    fn stage_all(&self, repo_path: &Path) -> Result<(), VcsError>;

    /// Commit the staged index.
    ///
    /// Works on a repository with no commits yet.
    fn commit(&self, repo_path: &Path, message: &str) -> Result<(), VcsError>;

    /// Point the `origin` remote at `url`, creating it if absent.
    fn set_remote(&self, repo_path: &Path, url: &str) -> Result<(), VcsError>;

    /// Name of the currently checked-out branch.
    ///
    /// Returns `None` when HEAD is detached or unborn.
    fn active_branch(&self, repo_path: &Path) -> Result<Option<String>, VcsError>;

    /// Create a branch at HEAD and switch to it.
    ///
    /// On a repository with no commits, points HEAD at the new branch so
    /// the next commit lands there.
    fn create_branch(&self, repo_path: &Path, name: &str) -> Result<(), VcsError>;

    /// Push `branch` to `origin`, setting its upstream.
    fn push(&self, repo_path: &Path, branch: &str, force: bool) -> Result<(), VcsError>;
}
