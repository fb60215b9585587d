//! ui
//!
//! Console output utilities.
//!
//! # Design
//!
//! All console output goes through [`output`] so that the `--quiet` and
//! `--debug` flags are honored consistently across commands.

pub mod output;
