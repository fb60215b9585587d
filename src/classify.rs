//! classify
//!
//! Binary/text classification for content rewriting.
//!
//! # Design
//!
//! A file is text when its entire contents decode as UTF-8. Anything else,
//! including files that cannot be read at all, is treated as binary. The
//! caller skips rewriting for binary files, so a misclassification costs a
//! missed rewrite rather than corrupted bytes.

use std::path::Path;

/// Check whether a file should be treated as binary.
///
/// Returns `true` for files whose bytes are not valid UTF-8 and for files
/// that cannot be read.
pub fn is_binary(path: &Path) -> bool {
    match std::fs::read(path) {
        Ok(bytes) => std::str::from_utf8(&bytes).is_err(),
        Err(_) => true,
    }
}
