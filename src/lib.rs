//! Rebrand - batch rename-and-rewrite migration of hosted repositories
//!
//! Rebrand is a single-binary tool that republishes every repository of a
//! source organization under a target organization with its naming
//! rewritten: file and directory names, text content, and the repository
//! name itself all pass through one ordered substitution rule list, and
//! each target starts as a single fresh commit with no carried-over
//! history.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to the pipeline)
//! - [`pipeline`] - Orchestrates one migration end to end, plus the batch driver
//! - [`rules`] - Ordered substitution rules and name conversion
//! - [`transform`] - Bottom-up tree rename and rewrite
//! - [`classify`] - Binary versus text decision for tree entries
//! - [`vcs`] - Single interface for all version-control operations
//! - [`forge`] - Abstraction for the remote hosting service (GitHub v1)
//! - [`config`] - Defaults, config file, environment, flag precedence
//! - [`ui`] - Console output utilities
//!
//! # Correctness Invariants
//!
//! 1. Substitution rules apply in a fixed order, first match wins
//! 2. Trees transform bottom-up so renames never invalidate pending paths
//! 3. Binary files are never rewritten
//! 4. Published history is always a single fresh commit

pub mod classify;
pub mod cli;
pub mod config;
pub mod forge;
pub mod pipeline;
pub mod rules;
pub mod transform;
pub mod ui;
pub mod vcs;
