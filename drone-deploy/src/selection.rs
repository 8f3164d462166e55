//! Candidate file selection.
//!
//! Patterns are ANT-style globs relative to a root directory, separated by
//! commas. A plain directory name, with or without a trailing `/`, selects
//! everything below that directory.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{DeployError, DeployResult};

/// Resolve `patterns` under `root` to a sorted, de-duplicated list of files.
pub fn select_files(root: &Path, patterns: &str) -> DeployResult<Vec<PathBuf>> {
    let root = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|source| DeployError::ReadFailed {
                path: root.to_path_buf(),
                source,
            })?
            .join(root)
    };
    if !root.is_dir() {
        return Err(DeployError::InvalidPattern(format!(
            "root {} is not a directory",
            root.display()
        )));
    }

    let mut files = BTreeSet::new();
    for pattern in split_patterns(patterns, &root) {
        let full = root.join(&pattern);
        let full = full.to_string_lossy();
        let paths = glob::glob(&full)
            .map_err(|e| DeployError::InvalidPattern(format!("'{}': {}", pattern, e)))?;

        let mut matched = 0usize;
        for entry in paths {
            match entry {
                Ok(path) if path.is_file() => {
                    matched += 1;
                    files.insert(path);
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Skipping unreadable path"),
            }
        }
        debug!(pattern = %pattern, matched, "Resolved file pattern");
    }

    Ok(files.into_iter().collect())
}

/// Split a comma-separated pattern list into globs under `root`.
///
/// `*` alone selects everything. An entry without glob characters that is
/// not an existing file under `root` is taken as a directory and expanded
/// to everything below it, so `plugins` and `plugins/` both mean
/// `plugins/**/*`.
pub fn split_patterns(patterns: &str, root: &Path) -> Vec<String> {
    patterns
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            if p == "*" || p == "*/" {
                return "**/*".to_string();
            }
            let is_glob = p.contains(|c| matches!(c, '*' | '?' | '['));
            if is_glob {
                return p.to_string();
            }
            if p.ends_with('/') || !root.join(p).is_file() {
                format!("{}/**/*", p.trim_end_matches('/'))
            } else {
                p.to_string()
            }
        })
        .collect()
}
