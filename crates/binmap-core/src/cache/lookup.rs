//! Executable lookup against a written cache.

use std::path::{Path, PathBuf};

use super::{CacheError, read_index, read_listing};
use crate::config::RehashConfig;
use crate::locate::find_manifest;
use crate::paths::{OutputLayout, normalize_path};

/// Full path of `executable` for the project containing `start`.
///
/// `None` when the project has no manifest, the manifest is not indexed, its
/// listing is gone, or the listing has no such executable.
pub fn lookup(
    layout: &OutputLayout,
    config: &RehashConfig,
    start: &Path,
    executable: &str,
) -> Result<Option<PathBuf>, CacheError> {
    let start = normalize_path(start).map_err(CacheError::InvalidPath)?;
    let Some(manifest) = find_manifest(&start, &config.manifest_file) else {
        return Ok(None);
    };

    let index = read_index(layout)?;
    let Some(entry) = index.iter().find(|entry| entry.manifest_path == manifest) else {
        return Ok(None);
    };

    let Some(listing) = read_listing(layout, &entry.listing_file)? else {
        return Ok(None);
    };

    Ok(listing
        .into_iter()
        .find(|item| item.executable == executable)
        .map(|item| item.bin_dir.join(executable)))
}
