//! pipeline
//!
//! Orchestrates the migration of a single repository:
//! Check -> Create -> Clone -> Transform -> Commit -> Push.
//!
//! # Architecture
//!
//! The [`Publisher`] drives one repository end to end against a `Forge`
//! (hosting API) and a `Vcs` (git), both held as trait objects so tests
//! run against mocks. The [`batch`] module loops a publisher over a
//! whole organization.
//!
//! # Lifecycle
//!
//! ```text
//! find target -> [skip | delete] -> create -> clone source
//!   -> strip history -> transform tree -> init -> commit
//!   -> set remote -> push (with retry) -> add collaborator
//! ```
//!
//! # Invariants
//!
//! - The target repository is created before any local work starts, so
//!   a creation failure costs nothing.
//! - The pushed history is always a single fresh commit. Source history
//!   never leaves the workspace.
//! - Only transport failures are retried, and only for the push.
//!
//! # Example
//!
//! ```ignore
//! use rebrand::pipeline::{PipelineConfig, Publisher};
//!
//! let config = PipelineConfig::new("bio-agents", work_dir);
//! let publisher = Publisher::new(&forge, &vcs, &rules, config, verbosity);
//! let outcome = publisher.publish(&source_repo, "sample-agent").await?;
//! ```

pub mod batch;

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::forge::{Forge, ForgeError, Permission, Repo};
use crate::rules::RuleSet;
use crate::transform::{TransformError, TreeTransformer};
use crate::ui::output::{self, Verbosity};
use crate::vcs::{Vcs, VcsError};

pub use batch::{run as run_batch, BatchConfig, BatchError, BatchSummary};

/// Commit message for the single commit each migrated repository gets.
pub const COMMIT_MESSAGE: &str = "Update content and rename";

/// Branch pushed when the fresh repository has no checked-out branch.
pub const DEFAULT_BRANCH: &str = "main";

/// Push attempts before giving up on a repository.
pub const MAX_PUSH_ATTEMPTS: u32 = 3;

/// Pause after remote create and delete, letting the service settle
/// before the next API call touches the same name.
pub const SETTLE_DELAY: Duration = Duration::from_secs(5);

/// Pause between push attempts.
pub const PUSH_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Errors from publishing a single repository.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Querying the target organization failed.
    #[error("failed to query {org}/{name}: {source}")]
    Query {
        org: String,
        name: String,
        source: ForgeError,
    },

    /// Deleting an existing target failed.
    #[error("failed to delete {org}/{name}: {source}")]
    Delete {
        org: String,
        name: String,
        source: ForgeError,
    },

    /// Creating the target repository failed.
    #[error("failed to create {org}/{name}: {source}")]
    Create {
        org: String,
        name: String,
        source: ForgeError,
    },

    /// Preparing the local workspace failed.
    #[error("workspace error at {path}: {source}")]
    WorkDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A version-control operation failed.
    #[error(transparent)]
    Vcs(#[from] VcsError),

    /// Rewriting the working tree failed.
    #[error(transparent)]
    Transform(#[from] TransformError),

    /// Every push attempt failed with a transport error.
    #[error("push failed after {attempts} attempts: {source}")]
    PushExhausted { attempts: u32, source: VcsError },
}

/// Result of publishing a single repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// The repository was migrated and pushed.
    Published {
        /// Target repository name.
        name: String,
        /// Branch that was pushed.
        branch: String,
        /// Pushes it took, 1 when the first succeeded.
        push_attempts: u32,
    },
    /// The target already existed and reprocessing was off.
    Skipped {
        /// Target repository name.
        name: String,
    },
}

/// Settings for a publishing run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Organization that receives migrated repositories.
    pub target_org: String,
    /// Directory that holds per-repository workspaces.
    pub work_dir: PathBuf,
    /// Delete and re-publish targets that already exist.
    pub reprocess: bool,
    /// Account granted admin on each published repository.
    pub collaborator: Option<String>,
    /// Pause after remote create and delete.
    pub settle_delay: Duration,
    /// Pause between push attempts.
    pub push_retry_delay: Duration,
    /// Push attempts before giving up.
    pub max_push_attempts: u32,
}

impl PipelineConfig {
    /// Create a config with default pacing and no collaborator.
    pub fn new(target_org: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_org: target_org.into(),
            work_dir: work_dir.into(),
            reprocess: false,
            collaborator: None,
            settle_delay: SETTLE_DELAY,
            push_retry_delay: PUSH_RETRY_DELAY,
            max_push_attempts: MAX_PUSH_ATTEMPTS,
        }
    }
}

/// Publishes one repository at a time.
pub struct Publisher<'a> {
    forge: &'a dyn Forge,
    vcs: &'a dyn Vcs,
    rules: &'a RuleSet,
    config: PipelineConfig,
    verbosity: Verbosity,
}

impl<'a> Publisher<'a> {
    /// Create a publisher over the given collaborators.
    pub fn new(
        forge: &'a dyn Forge,
        vcs: &'a dyn Vcs,
        rules: &'a RuleSet,
        config: PipelineConfig,
        verbosity: Verbosity,
    ) -> Self {
        Self {
            forge,
            vcs,
            rules,
            config,
            verbosity,
        }
    }

    /// Migrate `source` into the target organization as `target_name`.
    ///
    /// Existing targets are skipped unless the config asks for
    /// reprocessing, in which case they are deleted and rebuilt.
    pub async fn publish(
        &self,
        source: &Repo,
        target_name: &str,
    ) -> Result<PublishOutcome, PublishError> {
        let org = &self.config.target_org;

        let existing = self
            .forge
            .find_repo(org, target_name)
            .await
            .map_err(|source| PublishError::Query {
                org: org.clone(),
                name: target_name.to_string(),
                source,
            })?;

        if existing.is_some() {
            if !self.config.reprocess {
                output::print(
                    &format!("Skipping {}/{} (already exists)", org, target_name),
                    self.verbosity,
                );
                return Ok(PublishOutcome::Skipped {
                    name: target_name.to_string(),
                });
            }

            output::print(
                &format!("Deleting existing {}/{}...", org, target_name),
                self.verbosity,
            );
            self.forge
                .delete_repo(org, target_name)
                .await
                .map_err(|source| PublishError::Delete {
                    org: org.clone(),
                    name: target_name.to_string(),
                    source,
                })?;
            tokio::time::sleep(self.config.settle_delay).await;
        }

        output::print(
            &format!("Creating {}/{}...", org, target_name),
            self.verbosity,
        );
        let target = self
            .forge
            .create_repo(org, target_name)
            .await
            .map_err(|source| PublishError::Create {
                org: org.clone(),
                name: target_name.to_string(),
                source,
            })?;
        tokio::time::sleep(self.config.settle_delay).await;

        let dest = self.prepare_workspace(target_name)?;

        output::print(&format!("Cloning {}...", source.name), self.verbosity);
        self.vcs.clone_repo(&source.clone_url, &dest)?;
        self.vcs.strip_history(&dest)?;

        let stats = TreeTransformer::new(self.rules, self.verbosity).transform(&dest)?;
        output::debug(
            &format!(
                "transformed {}: {} dirs renamed, {} files renamed, {} files rewritten, {} skipped",
                target_name,
                stats.dirs_renamed,
                stats.files_renamed,
                stats.files_rewritten,
                stats.files_skipped
            ),
            self.verbosity,
        );

        self.vcs.init(&dest)?;
        self.vcs.stage_all(&dest)?;
        self.vcs.commit(&dest, COMMIT_MESSAGE)?;
        self.vcs.set_remote(&dest, &target.clone_url)?;

        let branch = match self.vcs.active_branch(&dest)? {
            Some(branch) => branch,
            None => {
                self.vcs.create_branch(&dest, DEFAULT_BRANCH)?;
                DEFAULT_BRANCH.to_string()
            }
        };

        let push_attempts = self.push_with_retry(&dest, &branch).await?;

        if let Some(account) = &self.config.collaborator {
            // Best effort. A missing collaborator is not worth failing a
            // completed migration over.
            if let Err(err) = self
                .forge
                .add_collaborator(org, target_name, account, Permission::Admin)
                .await
            {
                output::warn(
                    &format!(
                        "could not add collaborator {} to {}/{}: {}",
                        account, org, target_name, err
                    ),
                    self.verbosity,
                );
            }
        }

        output::success(
            &format!("Published {}/{}", org, target_name),
            self.verbosity,
        );

        Ok(PublishOutcome::Published {
            name: target_name.to_string(),
            branch,
            push_attempts,
        })
    }

    /// Clear and recreate the per-repository workspace directory.
    fn prepare_workspace(&self, target_name: &str) -> Result<PathBuf, PublishError> {
        std::fs::create_dir_all(&self.config.work_dir).map_err(|source| {
            PublishError::WorkDir {
                path: self.config.work_dir.clone(),
                source,
            }
        })?;

        let dest = self.config.work_dir.join(target_name);
        if dest.exists() {
            std::fs::remove_dir_all(&dest).map_err(|source| PublishError::WorkDir {
                path: dest.clone(),
                source,
            })?;
        }
        Ok(dest)
    }

    /// Push with a bounded retry loop. Only transport errors retry.
    async fn push_with_retry(&self, repo_path: &Path, branch: &str) -> Result<u32, PublishError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.vcs.push(repo_path, branch, true) {
                Ok(()) => return Ok(attempt),
                Err(err) if !matches!(err, VcsError::Transport { .. }) => return Err(err.into()),
                Err(err) if attempt >= self.config.max_push_attempts => {
                    return Err(PublishError::PushExhausted {
                        attempts: attempt,
                        source: err,
                    });
                }
                Err(err) => {
                    output::debug(
                        &format!("push attempt {} failed: {}", attempt, err),
                        self.verbosity,
                    );
                    output::print(
                        &format!(
                            "Push failed, retrying in {}s...",
                            self.config.push_retry_delay.as_secs()
                        ),
                        self.verbosity,
                    );
                    tokio::time::sleep(self.config.push_retry_delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forge::{FailOn, MockForge};
    use crate::vcs::{mock, MockVcs, VcsOperation};

    fn source_repo() -> Repo {
        Repo {
            name: "SampleTool".to_string(),
            clone_url: "https://github.com/bio-tools/SampleTool.git".to_string(),
        }
    }

    fn test_config(work_dir: &Path) -> PipelineConfig {
        PipelineConfig {
            target_org: "bio-agents".to_string(),
            work_dir: work_dir.to_path_buf(),
            reprocess: false,
            collaborator: None,
            settle_delay: Duration::ZERO,
            push_retry_delay: Duration::ZERO,
            max_push_attempts: MAX_PUSH_ATTEMPTS,
        }
    }

    fn transport_err() -> VcsError {
        VcsError::Transport {
            message: "remote hung up".to_string(),
        }
    }

    #[tokio::test]
    async fn publishes_into_fresh_target() {
        let dir = tempfile::tempdir().unwrap();
        let forge = MockForge::new();
        let vcs = MockVcs::new();
        let rules = RuleSet::branding();
        let publisher = Publisher::new(
            &forge,
            &vcs,
            &rules,
            test_config(dir.path()),
            Verbosity::Quiet,
        );

        let outcome = publisher
            .publish(&source_repo(), "sample-agent")
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PublishOutcome::Published {
                name: "sample-agent".to_string(),
                branch: "main".to_string(),
                push_attempts: 1,
            }
        );
        assert_eq!(forge.repo_names("bio-agents"), ["sample-agent"]);

        let ops = vcs.operations();
        let dest = dir.path().join("sample-agent");
        assert_eq!(
            ops[0],
            VcsOperation::CloneRepo {
                url: source_repo().clone_url,
                dest: dest.clone(),
            }
        );
        assert!(ops.contains(&VcsOperation::Commit {
            path: dest.clone(),
            message: COMMIT_MESSAGE.to_string(),
        }));
        assert!(ops.contains(&VcsOperation::Push {
            path: dest,
            branch: "main".to_string(),
            force: true,
        }));
    }

    #[tokio::test]
    async fn existing_target_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let forge = MockForge::new().with_repos(
            "bio-agents",
            vec![Repo {
                name: "sample-agent".to_string(),
                clone_url: "https://github.com/bio-agents/sample-agent.git".to_string(),
            }],
        );
        let vcs = MockVcs::new();
        let rules = RuleSet::branding();
        let publisher = Publisher::new(
            &forge,
            &vcs,
            &rules,
            test_config(dir.path()),
            Verbosity::Quiet,
        );

        let outcome = publisher
            .publish(&source_repo(), "sample-agent")
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PublishOutcome::Skipped {
                name: "sample-agent".to_string(),
            }
        );
        // Nothing local happened.
        assert!(vcs.operations().is_empty());
    }

    #[tokio::test]
    async fn reprocess_deletes_and_rebuilds() {
        let dir = tempfile::tempdir().unwrap();
        let forge = MockForge::new().with_repos(
            "bio-agents",
            vec![Repo {
                name: "sample-agent".to_string(),
                clone_url: "https://github.com/bio-agents/sample-agent.git".to_string(),
            }],
        );
        let vcs = MockVcs::new();
        let rules = RuleSet::branding();
        let mut config = test_config(dir.path());
        config.reprocess = true;
        let publisher = Publisher::new(&forge, &vcs, &rules, config, Verbosity::Quiet);

        let outcome = publisher
            .publish(&source_repo(), "sample-agent")
            .await
            .unwrap();

        assert!(matches!(outcome, PublishOutcome::Published { .. }));
        let ops = forge.operations();
        let delete_pos = ops
            .iter()
            .position(|op| matches!(op, crate::forge::MockOperation::DeleteRepo { .. }))
            .unwrap();
        let create_pos = ops
            .iter()
            .position(|op| matches!(op, crate::forge::MockOperation::CreateRepo { .. }))
            .unwrap();
        assert!(delete_pos < create_pos);
    }

    #[tokio::test]
    async fn transient_push_failures_are_retried() {
        let dir = tempfile::tempdir().unwrap();
        let forge = MockForge::new();
        let vcs = MockVcs::new()
            .with_push_results(vec![Err(transport_err()), Err(transport_err()), Ok(())]);
        let rules = RuleSet::branding();
        let publisher = Publisher::new(
            &forge,
            &vcs,
            &rules,
            test_config(dir.path()),
            Verbosity::Quiet,
        );

        let outcome = publisher
            .publish(&source_repo(), "sample-agent")
            .await
            .unwrap();

        assert_eq!(
            outcome,
            PublishOutcome::Published {
                name: "sample-agent".to_string(),
                branch: "main".to_string(),
                push_attempts: 3,
            }
        );
        assert_eq!(vcs.push_count(), 3);
    }

    #[tokio::test]
    async fn push_gives_up_after_max_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let forge = MockForge::new();
        let vcs = MockVcs::new().with_push_results(vec![
            Err(transport_err()),
            Err(transport_err()),
            Err(transport_err()),
        ]);
        let rules = RuleSet::branding();
        let publisher = Publisher::new(
            &forge,
            &vcs,
            &rules,
            test_config(dir.path()),
            Verbosity::Quiet,
        );

        let err = publisher
            .publish(&source_repo(), "sample-agent")
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::PushExhausted { attempts: 3, .. }));
        assert_eq!(vcs.push_count(), 3);
    }

    #[tokio::test]
    async fn non_transport_push_failure_is_not_retried() {
        let dir = tempfile::tempdir().unwrap();
        let forge = MockForge::new();
        let vcs = MockVcs::new().with_push_results(vec![Err(VcsError::Internal {
            message: "refspec error".to_string(),
        })]);
        let rules = RuleSet::branding();
        let publisher = Publisher::new(
            &forge,
            &vcs,
            &rules,
            test_config(dir.path()),
            Verbosity::Quiet,
        );

        let err = publisher
            .publish(&source_repo(), "sample-agent")
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Vcs(VcsError::Internal { .. })));
        assert_eq!(vcs.push_count(), 1);
    }

    #[tokio::test]
    async fn unborn_head_gets_default_branch() {
        let dir = tempfile::tempdir().unwrap();
        let forge = MockForge::new();
        let vcs = MockVcs::new().with_active_branch(None);
        let rules = RuleSet::branding();
        let publisher = Publisher::new(
            &forge,
            &vcs,
            &rules,
            test_config(dir.path()),
            Verbosity::Quiet,
        );

        let outcome = publisher
            .publish(&source_repo(), "sample-agent")
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            PublishOutcome::Published { ref branch, .. } if branch == DEFAULT_BRANCH
        ));
        assert!(vcs.operations().contains(&VcsOperation::CreateBranch {
            path: dir.path().join("sample-agent"),
            name: DEFAULT_BRANCH.to_string(),
        }));
    }

    #[tokio::test]
    async fn collaborator_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let forge = MockForge::new().fail_on(FailOn::AddCollaborator(ForgeError::ApiError {
            status: 403,
            message: "forbidden".to_string(),
        }));
        let vcs = MockVcs::new();
        let rules = RuleSet::branding();
        let mut config = test_config(dir.path());
        config.collaborator = Some("octocat".to_string());
        let publisher = Publisher::new(&forge, &vcs, &rules, config, Verbosity::Quiet);

        let outcome = publisher
            .publish(&source_repo(), "sample-agent")
            .await
            .unwrap();
        assert!(matches!(outcome, PublishOutcome::Published { .. }));
    }

    #[tokio::test]
    async fn stale_workspace_is_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("sample-agent");
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::write(dest.join("stale.txt"), "left over").unwrap();

        let forge = MockForge::new();
        let vcs = MockVcs::new();
        let rules = RuleSet::branding();
        let publisher = Publisher::new(
            &forge,
            &vcs,
            &rules,
            test_config(dir.path()),
            Verbosity::Quiet,
        );

        publisher
            .publish(&source_repo(), "sample-agent")
            .await
            .unwrap();

        // The mock clone recreated the directory empty.
        assert!(dest.is_dir());
        assert!(!dest.join("stale.txt").exists());
    }

    #[tokio::test]
    async fn create_failure_aborts_before_local_work() {
        let dir = tempfile::tempdir().unwrap();
        let forge = MockForge::new().fail_on(FailOn::CreateRepo(ForgeError::RateLimited));
        let vcs = MockVcs::new();
        let rules = RuleSet::branding();
        let publisher = Publisher::new(
            &forge,
            &vcs,
            &rules,
            test_config(dir.path()),
            Verbosity::Quiet,
        );

        let err = publisher
            .publish(&source_repo(), "sample-agent")
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Create { .. }));
        assert!(vcs.operations().is_empty());
    }

    #[tokio::test]
    async fn clone_failure_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let forge = MockForge::new();
        let vcs = MockVcs::new().fail_on(mock::FailOn::CloneRepo(VcsError::CloneFailed {
            url: source_repo().clone_url,
            message: "not found".to_string(),
        }));
        let rules = RuleSet::branding();
        let publisher = Publisher::new(
            &forge,
            &vcs,
            &rules,
            test_config(dir.path()),
            Verbosity::Quiet,
        );

        let err = publisher
            .publish(&source_repo(), "sample-agent")
            .await
            .unwrap_err();
        assert!(matches!(err, PublishError::Vcs(VcsError::CloneFailed { .. })));
    }
}
