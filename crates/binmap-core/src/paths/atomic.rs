//! Atomic file replacement.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Suffix of the temporary file written next to its target.
pub(crate) const TEMP_SUFFIX: &str = ".tmp";

/// Write `contents` to `path` atomically using temp file + rename.
///
/// 1. Write to `<path>.tmp`
/// 2. Rename to `<path>` (atomic on Unix/macOS)
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let temp_path = temp_path_for(path);
    fs::write(&temp_path, contents)?;
    fs::rename(&temp_path, path)
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map_or_else(OsString::new, std::ffi::OsStr::to_os_string);
    name.push(TEMP_SUFFIX);
    path.with_file_name(name)
}
