//! The manifest cache: `manifest.txt`, the listing files, and the rehash
//! pass that rewrites them.
//!
//! # Format
//!
//! Both files are UTF-8 line pairs, newline terminated, no blank lines.
//!
//! ```text
//! manifest.txt                  <sha256>.txt
//! /srv/app/Gemfile              rake
//! 3f1d...c2.txt                 /srv/app/vendor/bundle/ruby/3.2.0/bin
//! ```

mod index;
mod listing;
mod lookup;
mod manifest_set;
mod rehash;
mod sweep;

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::paths::PathError;

pub use index::{IndexWriter, parse_index, read_index};
pub use listing::{parse_listing, read_listing, render_listing, write_listing};
pub use lookup::lookup;
pub use manifest_set::{Candidate, ManifestSet};
pub use rehash::ManifestCache;
pub use sweep::sweep_listings;

/// Errors from reading or writing the output directory.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The output directory is unusable. Raised before anything is written.
    #[error("Output directory unusable: {0}")]
    OutputDir(#[source] PathError),

    /// A path given by the caller cannot be normalized.
    #[error(transparent)]
    InvalidPath(PathError),

    #[error("Failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No runtime can host the resolver; the run was aborted.
    #[error("Rehash aborted: {0}")]
    ResolverUnavailable(String),
}

impl CacheError {
    pub(crate) fn io<'a>(
        action: &'static str,
        path: &'a Path,
    ) -> impl FnOnce(io::Error) -> Self + 'a {
        move |source| Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

/// What one rehash pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RehashSummary {
    /// Manifests resolved and written.
    pub resolved: usize,
    /// Manifests kept from the previous index unchanged.
    pub retained: usize,
    /// Manifests without a usable profile.
    pub skipped: usize,
    /// Manifests whose resolution failed.
    pub failed: usize,
    /// Manifests that no longer exist.
    pub removed: usize,
    /// Unreferenced listing files deleted.
    pub swept: usize,
}

impl RehashSummary {
    /// Number of manifests in the new index.
    pub const fn indexed(&self) -> usize {
        self.resolved + self.retained
    }
}

impl fmt::Display for RehashSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} resolved, {} retained, {} skipped, {} failed, {} removed, {} swept",
            self.resolved, self.retained, self.skipped, self.failed, self.removed, self.swept
        )
    }
}
