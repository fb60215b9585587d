//! vcs::git
//!
//! `Vcs` implementation backed by git2 for local operations and the git
//! CLI for network transfer.
//!
//! # Design
//!
//! Local repository surgery (init, staging, committing, branch and
//! remote manipulation) goes through git2, which gives structured errors
//! and needs no subprocess. Clone and push shell out to `git` instead:
//! the system git picks up proxy and credential configuration that
//! libgit2 transports do not, and these are the only two operations that
//! cross the network.
//!
//! When a token is present it is embedded into `https://` URLs for
//! clone and remote configuration, and scrubbed from any error text
//! before it propagates.

use std::path::Path;
use std::process::Command;

use git2::{ErrorCode, Repository, Signature};

use super::traits::{Vcs, VcsError};

/// Placeholder substituted for the token in error messages.
const TOKEN_REDACTED: &str = "<token>";

/// Fallback identity when the host has no git identity configured.
const FALLBACK_IDENTITY: (&str, &str) = ("rebrand", "rebrand@localhost");

/// Git-backed `Vcs` implementation.
pub struct Git {
    /// Personal access token, embedded into https URLs when present.
    token: Option<String>,
}

// Manual Debug to avoid leaking the token.
impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("has_token", &self.token.is_some())
            .finish()
    }
}

impl Git {
    /// Create an instance that relies on ambient git credentials.
    pub fn new() -> Self {
        Self { token: None }
    }

    /// Create an instance that authenticates https URLs with `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Embed the token into an https URL. Other schemes pass through.
    fn authenticated_url(&self, url: &str) -> String {
        match (&self.token, url.strip_prefix("https://")) {
            (Some(token), Some(rest)) => format!("https://{}@{}", token, rest),
            _ => url.to_string(),
        }
    }

    /// Scrub the token from text destined for error messages or logs.
    fn redact(&self, text: &str) -> String {
        match &self.token {
            Some(token) if !token.is_empty() => text.replace(token, TOKEN_REDACTED),
            _ => text.to_string(),
        }
    }

    fn open(&self, repo_path: &Path) -> Result<Repository, VcsError> {
        Repository::open(repo_path).map_err(|e| VcsError::Internal {
            message: format!("failed to open {}: {}", repo_path.display(), e.message()),
        })
    }
}

impl Default for Git {
    fn default() -> Self {
        Self::new()
    }
}

impl From<git2::Error> for VcsError {
    fn from(err: git2::Error) -> Self {
        VcsError::Internal {
            message: err.message().to_string(),
        }
    }
}

impl Vcs for Git {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), VcsError> {
        let output = Command::new("git")
            .arg("clone")
            .arg(self.authenticated_url(url))
            .arg(dest)
            .output()
            .map_err(|e| VcsError::CloneFailed {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VcsError::CloneFailed {
                url: url.to_string(),
                message: self.redact(stderr.trim()),
            });
        }
        Ok(())
    }

    fn strip_history(&self, repo_path: &Path) -> Result<(), VcsError> {
        let git_dir = repo_path.join(".git");
        if git_dir.exists() {
            std::fs::remove_dir_all(&git_dir).map_err(|e| VcsError::Io {
                path: git_dir,
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    fn init(&self, repo_path: &Path) -> Result<(), VcsError> {
        Repository::init(repo_path)?;
        Ok(())
    }

    fn stage_all(&self, repo_path: &Path) -> Result<(), VcsError> {
        let repo = self.open(repo_path)?;
        let mut index = repo.index()?;
        index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
        index.write()?;
        Ok(())
    }

    fn commit(&self, repo_path: &Path, message: &str) -> Result<(), VcsError> {
        let repo = self.open(repo_path)?;
        let mut index = repo.index()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;

        let signature = repo
            .signature()
            .or_else(|_| Signature::now(FALLBACK_IDENTITY.0, FALLBACK_IDENTITY.1))?;

        // First commit on a fresh repository has no parent.
        let parent = match repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        Ok(())
    }

    fn set_remote(&self, repo_path: &Path, url: &str) -> Result<(), VcsError> {
        let repo = self.open(repo_path)?;
        let url = self.authenticated_url(url);
        if repo.find_remote("origin").is_ok() {
            repo.remote_set_url("origin", &url)?;
        } else {
            repo.remote("origin", &url)?;
        }
        Ok(())
    }

    fn active_branch(&self, repo_path: &Path) -> Result<Option<String>, VcsError> {
        let repo = self.open(repo_path)?;
        let result = match repo.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().map(String::from)),
            Ok(_) => Ok(None),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        };
        result
    }

    fn create_branch(&self, repo_path: &Path, name: &str) -> Result<(), VcsError> {
        let repo = self.open(repo_path)?;
        let refname = format!("refs/heads/{}", name);
        match repo.head() {
            Ok(head) => {
                let commit = head.peel_to_commit()?;
                repo.branch(name, &commit, true)?;
                repo.set_head(&refname)?;
            }
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                // No commits yet. Point HEAD at the unborn branch so the
                // next commit creates it.
                repo.set_head(&refname)?;
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }

    fn push(&self, repo_path: &Path, branch: &str, force: bool) -> Result<(), VcsError> {
        let mut args = vec!["push"];
        if force {
            args.push("--force");
        }
        args.extend(["--set-upstream", "origin", branch]);

        let output = Command::new("git")
            .args(&args)
            .current_dir(repo_path)
            .output()
            .map_err(|e| VcsError::Transport {
                message: format!("failed to run git push: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VcsError::Transport {
                message: self.redact(stderr.trim()),
            });
        }
        Ok(())
    }
}
