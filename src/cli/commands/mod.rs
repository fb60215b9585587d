//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments and resolves configuration
//! 2. Wires the forge, vcs, and rules together
//! 3. Delegates to the pipeline or transformer
//!
//! # Async Commands
//!
//! The migrate command is async because it talks to the hosting API.
//! Its handler is a synchronous wrapper that spins up a tokio runtime
//! and blocks on the async implementation.

mod apply;
mod completion;
mod migrate;

// Re-export command functions for testing and direct invocation
pub use apply::apply;
pub use completion::completion;
pub use migrate::{migrate, MigrateOptions};

use crate::cli::args::Command;
use crate::ui::output::Verbosity;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, verbosity: Verbosity) -> Result<()> {
    match command {
        Command::Migrate {
            token,
            source_org,
            target_org,
            work_dir,
            reprocess,
            repo,
            collaborator,
        } => migrate::migrate(
            verbosity,
            MigrateOptions {
                token,
                source_org,
                target_org,
                work_dir,
                reprocess,
                repo,
                collaborator,
            },
        ),
        Command::Apply {
            find,
            replace,
            path,
        } => apply::apply(verbosity, &find, &replace, &path),
        Command::Completion { shell } => completion::completion(shell),
    }
}
