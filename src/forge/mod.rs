//! forge
//!
//! Abstraction for remote forges that host the repositories being
//! migrated.
//!
//! # Architecture
//!
//! The `Forge` trait defines the interface for the hosting-service half
//! of a migration: finding, listing, creating, and deleting repositories,
//! plus collaborator management. Everything that touches the service's
//! API lives behind this trait; the pipeline only sees trait objects, so
//! tests swap in [`mock::MockForge`] without touching the network.
//!
//! Git data transfer (clone, push) is deliberately not part of this
//! trait. That belongs to `vcs`, which speaks the git protocol rather
//! than a REST API.
//!
//! # Modules
//!
//! - `traits`: Core `Forge` trait and request/response types
//! - [`github`]: GitHub implementation using the REST API
//! - [`mock`]: Mock implementation for deterministic testing
//!
//! # Example
//!
//! ```ignore
//! use rebrand::forge::{Forge, GitHubForge};
//!
//! let forge = GitHubForge::new(token);
//!
//! if forge.find_repo("bio-agents", "sample-agent").await?.is_none() {
//!     let repo = forge.create_repo("bio-agents", "sample-agent").await?;
//!     println!("Created {}", repo.clone_url);
//! }
//! ```

pub mod github;
pub mod mock;
mod traits;

pub use github::GitHubForge;
pub use mock::{FailOn, MockForge, MockOperation};
pub use traits::*;
