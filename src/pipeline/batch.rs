//! pipeline::batch
//!
//! Drives the publisher across every repository in a source
//! organization.
//!
//! # Design
//!
//! The batch driver is deliberately thin: list the source organization
//! (or select a single repository), derive each target name, and hand
//! one repository at a time to the [`Publisher`]. Failures are reported
//! and counted, never fatal; one broken repository must not strand the
//! rest of the batch. Errors from this module itself can only occur
//! before any repository has been touched.

use thiserror::Error;

use crate::forge::{Forge, ForgeError, Repo};
use crate::rules::{naming, RuleSet};
use crate::ui::output::{self, Verbosity};
use crate::vcs::Vcs;

use super::{PipelineConfig, PublishOutcome, Publisher};

/// Control repository name that is never migrated.
const CONTROL_REPO: &str = ".github";

/// Errors that abort a batch before it starts.
#[derive(Debug, Error)]
pub enum BatchError {
    /// Listing the source organization failed.
    #[error("failed to list {org}: {source}")]
    List { org: String, source: ForgeError },

    /// A single requested repository does not exist.
    #[error("repository {org}/{name} not found")]
    SourceNotFound { org: String, name: String },

    /// Looking up a single requested repository failed.
    #[error("failed to query {org}/{name}: {source}")]
    Query {
        org: String,
        name: String,
        source: ForgeError,
    },
}

/// Settings for a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Organization to migrate from.
    pub source_org: String,
    /// Migrate only this repository instead of the whole organization.
    pub repo: Option<String>,
    /// Per-repository pipeline settings.
    pub pipeline: PipelineConfig,
}

/// Tally of a completed batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Repositories migrated and pushed.
    pub published: u32,
    /// Targets that already existed.
    pub skipped: u32,
    /// Repositories whose migration failed.
    pub failed: u32,
}

/// Migrate a source organization into the target organization.
///
/// Each repository's target name is its source name run through the
/// substitution rules and then kebab-cased. Per-repository failures are
/// printed and tallied; the run continues with the next repository.
pub async fn run(
    forge: &dyn Forge,
    vcs: &dyn Vcs,
    rules: &RuleSet,
    config: &BatchConfig,
    verbosity: Verbosity,
) -> Result<BatchSummary, BatchError> {
    let worklist = select_repos(forge, config).await?;
    output::print(
        &format!(
            "Found {} repositories in {}",
            worklist.len(),
            config.source_org
        ),
        verbosity,
    );

    let publisher = Publisher::new(forge, vcs, rules, config.pipeline.clone(), verbosity);
    let mut summary = BatchSummary::default();

    for repo in &worklist {
        if repo.name.eq_ignore_ascii_case(CONTROL_REPO) {
            output::debug(&format!("ignoring control repository {}", repo.name), verbosity);
            continue;
        }

        let target_name = naming::kebab_case(&rules.apply(&repo.name));
        output::print(
            &format!("Processing {} -> {}", repo.name, target_name),
            verbosity,
        );

        match publisher.publish(repo, &target_name).await {
            Ok(PublishOutcome::Published { .. }) => summary.published += 1,
            Ok(PublishOutcome::Skipped { .. }) => summary.skipped += 1,
            Err(err) => {
                output::error(&format!("Failed to migrate {}: {}", repo.name, err));
                summary.failed += 1;
            }
        }
    }

    output::print(
        &format!(
            "Done: {} published, {} skipped, {} failed",
            summary.published, summary.skipped, summary.failed
        ),
        verbosity,
    );
    Ok(summary)
}

/// Resolve the repositories this run covers.
async fn select_repos(forge: &dyn Forge, config: &BatchConfig) -> Result<Vec<Repo>, BatchError> {
    match &config.repo {
        Some(name) => {
            let repo = forge
                .find_repo(&config.source_org, name)
                .await
                .map_err(|source| BatchError::Query {
                    org: config.source_org.clone(),
                    name: name.clone(),
                    source,
                })?
                .ok_or_else(|| BatchError::SourceNotFound {
                    org: config.source_org.clone(),
                    name: name.clone(),
                })?;
            Ok(vec![repo])
        }
        None => forge
            .list_repos(&config.source_org)
            .await
            .map_err(|source| BatchError::List {
                org: config.source_org.clone(),
                source,
            }),
    }
}
