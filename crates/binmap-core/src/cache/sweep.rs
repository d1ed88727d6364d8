//! Garbage collection of unreferenced listing files.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use super::CacheError;
use crate::domain::is_listing_name;

/// Delete every listing-shaped file in `dir` whose name is not in `keep`.
///
/// Returns the number of files deleted. Other files are never touched.
pub fn sweep_listings(dir: &Path, keep: &BTreeSet<String>) -> Result<usize, CacheError> {
    let entries = fs::read_dir(dir).map_err(CacheError::io("list", dir))?;
    let mut swept = 0;

    for entry in entries.flatten() {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if !is_listing_name(&name) || keep.contains(&name) {
            continue;
        }
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(file = %name, "Removed stale listing");
                swept += 1;
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(CacheError::io("remove", &path)(e)),
        }
    }

    Ok(swept)
}

/// Delete one listing file; a missing file is fine.
pub(crate) fn remove_listing(path: &Path) -> Result<(), CacheError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CacheError::io("remove", path)(e)),
    }
}
