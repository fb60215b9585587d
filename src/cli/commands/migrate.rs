//! cli::commands::migrate
//!
//! Batch migration of an organization's repositories.
//!
//! # Design
//!
//! The handler resolves configuration, wires the GitHub forge and the
//! git backend together, and hands off to the batch driver. All
//! per-repository decisions (skip, reprocess, retry) live in the
//! pipeline; this layer only fails when the run cannot start at all.
//!
//! # Example
//!
//! ```bash
//! # Migrate the default organizations
//! rebrand migrate --token ghp_xxx
//!
//! # One repository, rebuilding the target if it exists
//! rebrand migrate --repo SampleTool --reprocess
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context as _, Result};

use crate::config::{Overrides, Settings, TOKEN_ENV};
use crate::forge::GitHubForge;
use crate::pipeline::{self, BatchConfig, PipelineConfig};
use crate::rules::RuleSet;
use crate::ui::output::Verbosity;
use crate::vcs::Git;

/// Migrate options parsed from CLI arguments.
#[derive(Debug)]
pub struct MigrateOptions {
    pub token: Option<String>,
    pub source_org: Option<String>,
    pub target_org: Option<String>,
    pub work_dir: Option<PathBuf>,
    pub reprocess: bool,
    pub repo: Option<String>,
    pub collaborator: Option<String>,
}

/// Run the migrate command.
///
/// This is a synchronous wrapper that uses tokio to run the async implementation.
pub fn migrate(verbosity: Verbosity, opts: MigrateOptions) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(migrate_async(verbosity, opts))
}

/// Async implementation of migrate.
async fn migrate_async(verbosity: Verbosity, opts: MigrateOptions) -> Result<()> {
    let overrides = Overrides {
        token: opts.token,
        source_org: opts.source_org,
        target_org: opts.target_org,
        work_dir: opts.work_dir,
        collaborator: opts.collaborator,
    };
    let settings = Settings::resolve(&overrides).context("failed to load configuration")?;

    let Some(token) = settings.token.clone() else {
        bail!(
            "no access token configured; pass --token, set {}, or add 'token' to rebrand.toml",
            TOKEN_ENV
        );
    };

    let forge = GitHubForge::new(token.clone());
    let vcs = Git::with_token(token);
    let rules = RuleSet::branding();

    let mut pipeline_config =
        PipelineConfig::new(settings.target_org.clone(), settings.work_dir.clone());
    pipeline_config.reprocess = opts.reprocess;
    pipeline_config.collaborator = settings.collaborator.clone();

    let config = BatchConfig {
        source_org: settings.source_org.clone(),
        repo: opts.repo,
        pipeline: pipeline_config,
    };

    // Per-repository failures are reported and tallied inside the batch.
    // Only a run that cannot start reaches the caller as an error.
    pipeline::run_batch(&forge, &vcs, &rules, &config, verbosity)
        .await
        .context("migration could not start")?;

    Ok(())
}
