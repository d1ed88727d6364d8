//! The manifests a rehash pass visits.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::CacheError;
use crate::domain::IndexEntry;
use crate::locate::find_manifest;
use crate::paths::normalize_path;

/// Why a manifest is part of the pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Passed in for (re-)resolution. Carries the listing it had in the
    /// previous index, if refreshing.
    Requested { previous_listing: Option<String> },
    /// Carried over from the previous index untouched.
    Retained { listing_file: String },
}

/// Ordered, duplicate-free set of manifests for one pass.
///
/// Requested manifests come first in the order given, then manifests carried
/// over from the previous index in index order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestSet {
    entries: Vec<(PathBuf, Candidate)>,
}

impl ManifestSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve each directory to its nearest manifest and request it.
    ///
    /// Directories without a manifest are dropped silently.
    pub fn discover<P: AsRef<Path>>(dirs: &[P], manifest_file: &str) -> Result<Self, CacheError> {
        let mut set = Self::new();
        for dir in dirs {
            let dir = normalize_path(dir.as_ref()).map_err(CacheError::InvalidPath)?;
            match find_manifest(&dir, manifest_file) {
                Some(manifest) => set.request(manifest),
                None => debug!(dir = %dir.display(), "No manifest found"),
            }
        }
        Ok(set)
    }

    /// Add a manifest for resolution. Repeats are ignored.
    pub fn request(&mut self, manifest: PathBuf) {
        if self.position(&manifest).is_none() {
            self.entries.push((
                manifest,
                Candidate::Requested {
                    previous_listing: None,
                },
            ));
        }
    }

    /// Merge in the previous index for a refresh.
    ///
    /// Requested manifests learn their previous listing; the rest are retained.
    pub fn seed_from_index(&mut self, previous: Vec<IndexEntry>) {
        for entry in previous {
            match self.position(&entry.manifest_path) {
                Some(i) => {
                    if let Candidate::Requested { previous_listing } = &mut self.entries[i].1 {
                        *previous_listing = Some(entry.listing_file);
                    }
                }
                None => self.entries.push((
                    entry.manifest_path,
                    Candidate::Retained {
                        listing_file: entry.listing_file,
                    },
                )),
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Candidate)> {
        self.entries
            .iter()
            .map(|(path, candidate)| (path.as_path(), candidate))
    }

    fn position(&self, manifest: &Path) -> Option<usize> {
        self.entries.iter().position(|(path, _)| path == manifest)
    }
}

impl IntoIterator for ManifestSet {
    type Item = (PathBuf, Candidate);
    type IntoIter = std::vec::IntoIter<(PathBuf, Candidate)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
