//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rebrand - batch rename-and-rewrite migration of hosted repositories
#[derive(Parser, Debug)]
#[command(name = "rebrand")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Migrate every repository from the source organization
    #[command(
        name = "migrate",
        long_about = "Migrate repositories from the source organization into the target organization.\n\n\
            For each source repository, migrate creates a fresh repository under the \
            target organization, clones the source content, renames files and \
            directories and rewrites text content according to the built-in \
            substitution rules, and pushes the result as a single commit with no \
            carried-over history. Targets that already exist are skipped unless \
            --reprocess is given.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Migrate the default organizations
    rebrand migrate --token ghp_xxx

    # Token from the environment instead of a flag
    export GITHUB_PERSONAL_TOKEN=ghp_xxx
    rebrand migrate

    # One repository only
    rebrand migrate --repo SampleTool

    # Rebuild targets that already exist
    rebrand migrate --reprocess

    # Different organizations and a scratch directory
    rebrand migrate --source-org my-old-org --target-org my-new-org --work-dir /tmp/migration

EXIT BEHAVIOR:
    Per-repository failures are reported and counted but never stop the
    batch. The process exits non-zero only when the run cannot start at
    all (bad flags, missing token, unlistable source organization)."
    )]
    Migrate {
        /// Access token for the hosting service
        #[arg(long)]
        token: Option<String>,

        /// Organization to migrate from
        #[arg(long)]
        source_org: Option<String>,

        /// Organization to migrate into
        #[arg(long)]
        target_org: Option<String>,

        /// Directory that holds local working copies
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// Delete and re-publish targets that already exist
        #[arg(long)]
        reprocess: bool,

        /// Migrate a single repository instead of the whole organization
        #[arg(long)]
        repo: Option<String>,

        /// Account granted admin on each published repository; pass "" to grant nobody
        #[arg(long)]
        collaborator: Option<String>,
    },

    /// Apply one substitution to a local tree in place
    #[command(
        name = "apply",
        long_about = "Apply a single substitution pair to a local directory tree.\n\n\
            Renames files and directories whose names match the pattern and rewrites \
            matches inside text files, exactly as migrate does with its built-in rule \
            list, but with one rule of your choosing and no publishing. Binary files \
            are left untouched.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Rewrite a checked-out tree
    rebrand apply --find tools --replace agents ./my-repo

    # Patterns are regular expressions
    rebrand apply --find 'bio\\.tools' --replace bio.agents ./my-repo

    # Defaults to the current directory
    rebrand apply --find ELIXIR --replace IECHOR"
    )]
    Apply {
        /// Pattern to search for (regular expression)
        #[arg(long, short)]
        find: String,

        /// Replacement text
        #[arg(long, short)]
        replace: String,

        /// Tree to transform
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        long_about = "Generate shell completion scripts for tab-completion.\n\n\
            Outputs a completion script for the specified shell. Add the output \
            to your shell's configuration to enable tab-completion for rebrand commands.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Bash (add to ~/.bashrc)
    rebrand completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    rebrand completion zsh >> ~/.zshrc

    # Fish
    rebrand completion fish > ~/.config/fish/completions/rebrand.fish

    # PowerShell
    rebrand completion powershell >> $PROFILE"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
