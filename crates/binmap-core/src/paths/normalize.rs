//! Lexical path normalization.
//!
//! Manifest paths are identity keys in the index and the input of the listing
//! file hash, so the same project must always produce the same path. Paths are
//! made absolute and `.`/`..` components are folded without touching the
//! filesystem (symlinks are kept as given).

use std::env;
use std::path::{Component, Path, PathBuf};

use super::error::PathError;

/// Make `path` absolute against the current directory and fold `.` and `..`.
pub fn normalize_path(path: &Path) -> Result<PathBuf, PathError> {
    if path.as_os_str().is_empty() {
        return Err(PathError::EmptyPath);
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(path))
            .map_err(|e| PathError::CurrentDirError(e.to_string()))?
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// Expand a leading `~` against `home`, then resolve relative paths against `base`.
pub fn expand_user_path(raw: &str, base: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let expanded = if trimmed == "~" {
        home?.to_path_buf()
    } else if let Some(rest) = trimmed.strip_prefix("~/") {
        home?.join(rest)
    } else {
        PathBuf::from(trimmed)
    };

    let joined = if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    };
    normalize_path(&joined).ok()
}
