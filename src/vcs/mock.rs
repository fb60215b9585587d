//! vcs::mock
//!
//! Mock `Vcs` implementation for deterministic testing.
//!
//! # Design
//!
//! The mock records every call for verification and performs no real
//! version-control work, with one exception: `clone_repo` creates the
//! destination directory so code that walks the cloned tree afterwards
//! has something to walk.
//!
//! Push outcomes are scripted as a queue of results, which is how tests
//! exercise retry behavior. An exhausted queue means success.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::traits::{Vcs, VcsError};

/// Mock vcs for testing.
#[derive(Debug, Clone)]
pub struct MockVcs {
    inner: Arc<Mutex<MockVcsInner>>,
}

#[derive(Debug)]
struct MockVcsInner {
    /// Recorded operations for verification.
    operations: Vec<VcsOperation>,
    /// Scripted push outcomes, consumed front to back.
    push_results: VecDeque<Result<(), VcsError>>,
    /// Branch reported by `active_branch`.
    active_branch: Option<String>,
    /// Method to fail on (for testing error paths).
    fail_on: Option<FailOn>,
}

/// Configuration for which operation should fail.
///
/// Push failures are scripted through `with_push_results` instead, so
/// they can vary across attempts.
#[derive(Debug, Clone)]
pub enum FailOn {
    CloneRepo(VcsError),
    StripHistory(VcsError),
    Init(VcsError),
    StageAll(VcsError),
    Commit(VcsError),
    SetRemote(VcsError),
    ActiveBranch(VcsError),
    CreateBranch(VcsError),
}

/// Recorded operation for test verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VcsOperation {
    CloneRepo { url: String, dest: PathBuf },
    StripHistory { path: PathBuf },
    Init { path: PathBuf },
    StageAll { path: PathBuf },
    Commit { path: PathBuf, message: String },
    SetRemote { path: PathBuf, url: String },
    ActiveBranch { path: PathBuf },
    CreateBranch { path: PathBuf, name: String },
    Push { path: PathBuf, branch: String, force: bool },
}

impl MockVcs {
    /// Create a new mock that succeeds at everything and reports `main`
    /// as the active branch.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockVcsInner {
                operations: Vec::new(),
                push_results: VecDeque::new(),
                active_branch: Some("main".to_string()),
                fail_on: None,
            })),
        }
    }

    /// Set the branch reported by `active_branch`. `None` simulates a
    /// detached or unborn HEAD.
    pub fn with_active_branch(self, branch: Option<&str>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.active_branch = branch.map(String::from);
        }
        self
    }

    /// Script the outcomes of successive pushes.
    ///
    /// # Example
    ///
    /// ```
    /// use rebrand::vcs::mock::MockVcs;
    /// use rebrand::vcs::VcsError;
    ///
    /// let vcs = MockVcs::new().with_push_results(vec![
    ///     Err(VcsError::Transport { message: "timeout".to_string() }),
    ///     Ok(()),
    /// ]);
    /// ```
    pub fn with_push_results(self, results: Vec<Result<(), VcsError>>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.push_results = results.into();
        }
        self
    }

    /// Configure the mock to fail on a specific operation.
    pub fn fail_on(self, fail_on: FailOn) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(fail_on);
        }
        self
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<VcsOperation> {
        let inner = self.inner.lock().unwrap();
        inner.operations.clone()
    }

    /// Clear recorded operations.
    pub fn clear_operations(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.clear();
    }

    /// Number of pushes attempted so far.
    pub fn push_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner
            .operations
            .iter()
            .filter(|op| matches!(op, VcsOperation::Push { .. }))
            .count()
    }

    fn record(&self, op: VcsOperation) {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push(op);
    }

    fn check_fail(&self, expected: &str) -> Result<(), VcsError> {
        let inner = self.inner.lock().unwrap();
        match &inner.fail_on {
            Some(FailOn::CloneRepo(e)) if expected == "clone_repo" => Err(e.clone()),
            Some(FailOn::StripHistory(e)) if expected == "strip_history" => Err(e.clone()),
            Some(FailOn::Init(e)) if expected == "init" => Err(e.clone()),
            Some(FailOn::StageAll(e)) if expected == "stage_all" => Err(e.clone()),
            Some(FailOn::Commit(e)) if expected == "commit" => Err(e.clone()),
            Some(FailOn::SetRemote(e)) if expected == "set_remote" => Err(e.clone()),
            Some(FailOn::ActiveBranch(e)) if expected == "active_branch" => Err(e.clone()),
            Some(FailOn::CreateBranch(e)) if expected == "create_branch" => Err(e.clone()),
            _ => Ok(()),
        }
    }
}

impl Default for MockVcs {
    fn default() -> Self {
        Self::new()
    }
}

impl Vcs for MockVcs {
    fn clone_repo(&self, url: &str, dest: &Path) -> Result<(), VcsError> {
        self.record(VcsOperation::CloneRepo {
            url: url.to_string(),
            dest: dest.to_path_buf(),
        });
        self.check_fail("clone_repo")?;

        // Give downstream tree walks something real to operate on.
        std::fs::create_dir_all(dest).map_err(|e| VcsError::Io {
            path: dest.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn strip_history(&self, repo_path: &Path) -> Result<(), VcsError> {
        self.record(VcsOperation::StripHistory {
            path: repo_path.to_path_buf(),
        });
        self.check_fail("strip_history")
    }

    fn init(&self, repo_path: &Path) -> Result<(), VcsError> {
        self.record(VcsOperation::Init {
            path: repo_path.to_path_buf(),
        });
        self.check_fail("init")
    }

    fn stage_all(&self, repo_path: &Path) -> Result<(), VcsError> {
        self.record(VcsOperation::StageAll {
            path: repo_path.to_path_buf(),
        });
        self.check_fail("stage_all")
    }

    fn commit(&self, repo_path: &Path, message: &str) -> Result<(), VcsError> {
        self.record(VcsOperation::Commit {
            path: repo_path.to_path_buf(),
            message: message.to_string(),
        });
        self.check_fail("commit")
    }

    fn set_remote(&self, repo_path: &Path, url: &str) -> Result<(), VcsError> {
        self.record(VcsOperation::SetRemote {
            path: repo_path.to_path_buf(),
            url: url.to_string(),
        });
        self.check_fail("set_remote")
    }

    fn active_branch(&self, repo_path: &Path) -> Result<Option<String>, VcsError> {
        self.record(VcsOperation::ActiveBranch {
            path: repo_path.to_path_buf(),
        });
        self.check_fail("active_branch")?;

        let inner = self.inner.lock().unwrap();
        Ok(inner.active_branch.clone())
    }

    fn create_branch(&self, repo_path: &Path, name: &str) -> Result<(), VcsError> {
        self.record(VcsOperation::CreateBranch {
            path: repo_path.to_path_buf(),
            name: name.to_string(),
        });
        self.check_fail("create_branch")?;

        let mut inner = self.inner.lock().unwrap();
        inner.active_branch = Some(name.to_string());
        Ok(())
    }

    fn push(&self, repo_path: &Path, branch: &str, force: bool) -> Result<(), VcsError> {
        self.record(VcsOperation::Push {
            path: repo_path.to_path_buf(),
            branch: branch.to_string(),
            force,
        });

        let mut inner = self.inner.lock().unwrap();
        inner.push_results.pop_front().unwrap_or(Ok(()))
    }
}
