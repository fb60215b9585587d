//! vcs
//!
//! Single interface for all version-control operations.
//!
//! # Architecture
//!
//! This module is the only doorway to git. All repository reads and
//! writes flow through the [`Vcs`] trait; no other module imports `git2`
//! or shells out to the git CLI. The pipeline holds a `&dyn Vcs`, so
//! tests substitute [`mock::MockVcs`] and never touch a real repository.
//!
//! # Responsibilities
//!
//! - Cloning the source repository
//! - Discarding history and re-initializing over the transformed tree
//! - Staging, committing, branch and remote management
//! - Pushing to the target remote
//!
//! # Modules
//!
//! - `traits`: Core `Vcs` trait and error types
//! - [`git`]: Implementation backed by git2 and the git CLI
//! - [`mock`]: Mock implementation for deterministic testing

pub mod git;
pub mod mock;
mod traits;

pub use git::Git;
pub use mock::{MockVcs, VcsOperation};
pub use traits::*;
