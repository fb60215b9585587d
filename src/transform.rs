//! transform
//!
//! In-place rename and rewrite of a directory tree.
//!
//! # Design
//!
//! The traversal is bottom-up: every subdirectory's contents are fully
//! processed before the subdirectory itself is renamed. Renaming a
//! directory therefore never invalidates a path the transformer still
//! holds, because the only paths touched afterwards are at or above the
//! renamed entry. The root directory itself is never renamed; its name is
//! the caller's business.
//!
//! For each directory, after recursion, subdirectory names are rewritten
//! first, then file names, then file contents. Binary files (per
//! [`crate::classify::is_binary`]) are renamed but their contents are left
//! byte-for-byte intact. Entries named `.git` are skipped entirely so the
//! transformer can run inside a checkout without corrupting repository
//! internals.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::classify::is_binary;
use crate::rules::RuleSet;
use crate::ui::output::{self, Verbosity};

/// Errors from a tree transformation.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A directory could not be listed.
    #[error("failed to read directory '{path}': {source}")]
    ReadDir {
        /// The directory being listed
        path: PathBuf,
        source: std::io::Error,
    },

    /// A rename failed, usually a collision or a permission problem.
    #[error("failed to rename '{from}' to '{to}': {source}")]
    Rename {
        /// The entry's current path
        from: PathBuf,
        /// The path it was being renamed to
        to: PathBuf,
        source: std::io::Error,
    },

    /// Rewritten content could not be written back.
    #[error("failed to write '{path}': {source}")]
    Write {
        /// The file being written
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Counters collected during a tree transformation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Directories whose name changed
    pub dirs_renamed: usize,
    /// Files whose name changed
    pub files_renamed: usize,
    /// Files whose contents changed
    pub files_rewritten: usize,
    /// Files whose contents were skipped (binary or undecodable)
    pub files_skipped: usize,
}

/// Applies a rule set to every name and text file under a root.
pub struct TreeTransformer<'a> {
    rules: &'a RuleSet,
    verbosity: Verbosity,
}

impl<'a> TreeTransformer<'a> {
    /// Create a transformer over the given rules.
    pub fn new(rules: &'a RuleSet, verbosity: Verbosity) -> Self {
        Self { rules, verbosity }
    }

    /// Transform the tree rooted at `root` in place.
    ///
    /// # Errors
    ///
    /// Fails on unreadable directories, rename collisions, permission
    /// problems, and write failures. Undecodable file contents are not an
    /// error; those files keep their bytes and are counted in
    /// [`TransformStats::files_skipped`].
    pub fn transform(&self, root: &Path) -> Result<TransformStats, TransformError> {
        let mut stats = TransformStats::default();
        self.walk(root, &mut stats)?;
        Ok(stats)
    }

    fn walk(&self, dir: &Path, stats: &mut TransformStats) -> Result<(), TransformError> {
        let read_dir = fs::read_dir(dir).map_err(|source| TransformError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut subdirs = Vec::new();
        let mut files = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|source| TransformError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;
            let name = entry.file_name();
            if name == ".git" {
                continue;
            }
            let file_type = entry.file_type().map_err(|source| TransformError::ReadDir {
                path: entry.path(),
                source,
            })?;
            if file_type.is_dir() {
                subdirs.push(name);
            } else {
                // Symlinks are treated as files: renamed, never followed.
                files.push(name);
            }
        }

        // Recurse before renaming so child paths stay valid.
        for name in &subdirs {
            self.walk(&dir.join(name), stats)?;
        }

        for name in &subdirs {
            let Some(name_str) = name.to_str() else {
                // Nothing to match against in a non-UTF-8 name.
                continue;
            };
            let new_name = self.rules.apply(name_str);
            if new_name != name_str {
                let old_path = dir.join(name);
                let new_path = dir.join(&new_name);
                fs::rename(&old_path, &new_path).map_err(|source| TransformError::Rename {
                    from: old_path.clone(),
                    to: new_path.clone(),
                    source,
                })?;
                output::print(
                    format!(
                        "Renamed directory: {} -> {}",
                        old_path.display(),
                        new_path.display()
                    ),
                    self.verbosity,
                );
                stats.dirs_renamed += 1;
            }
        }

        for name in &files {
            let mut path = dir.join(name);

            if let Some(name_str) = name.to_str() {
                let new_name = self.rules.apply(name_str);
                if new_name != name_str {
                    let new_path = dir.join(&new_name);
                    fs::rename(&path, &new_path).map_err(|source| TransformError::Rename {
                        from: path.clone(),
                        to: new_path.clone(),
                        source,
                    })?;
                    output::print(
                        format!("Renamed file: {} -> {}", path.display(), new_path.display()),
                        self.verbosity,
                    );
                    stats.files_renamed += 1;
                    path = new_path;
                }
            }

            self.rewrite_file(&path, stats)?;
        }

        Ok(())
    }

    /// Rewrite one file's contents, if it is text and any rule matches.
    fn rewrite_file(&self, path: &Path, stats: &mut TransformStats) -> Result<(), TransformError> {
        if is_binary(path) {
            output::debug(
                format!("skipped content replacement for binary file: {}", path.display()),
                self.verbosity,
            );
            stats.files_skipped += 1;
            return Ok(());
        }

        match fs::read_to_string(path) {
            Ok(content) => {
                let new_content = self.rules.apply(&content);
                if new_content != content {
                    fs::write(path, new_content).map_err(|source| TransformError::Write {
                        path: path.to_path_buf(),
                        source,
                    })?;
                    output::print(
                        format!("Updated content in: {}", path.display()),
                        self.verbosity,
                    );
                    stats.files_rewritten += 1;
                }
                Ok(())
            }
            Err(_) => {
                // Decoding can still fail after classification if the file
                // changed underneath us; skip rather than abort.
                output::debug(
                    format!(
                        "skipped content replacement for undecodable file: {}",
                        path.display()
                    ),
                    self.verbosity,
                );
                stats.files_skipped += 1;
                Ok(())
            }
        }
    }
}
