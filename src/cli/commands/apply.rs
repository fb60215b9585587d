//! cli::commands::apply
//!
//! Apply one substitution pair to a local tree in place.
//!
//! Uses the same rename-and-rewrite walk as migrate, with a single
//! user-supplied rule and no remote side.

use std::path::Path;

use anyhow::{Context as _, Result};

use crate::rules::RuleSet;
use crate::transform::TreeTransformer;
use crate::ui::output::{self, Verbosity};

/// Run the apply command.
pub fn apply(verbosity: Verbosity, find: &str, replace: &str, path: &Path) -> Result<()> {
    let rules = RuleSet::single(find, replace).context("invalid pattern")?;

    let stats = TreeTransformer::new(&rules, verbosity)
        .transform(path)
        .with_context(|| format!("failed to transform {}", path.display()))?;

    output::success(
        &format!(
            "Applied: {} directories renamed, {} files renamed, {} files rewritten, {} skipped",
            stats.dirs_renamed, stats.files_renamed, stats.files_rewritten, stats.files_skipped
        ),
        verbosity,
    );
    Ok(())
}
