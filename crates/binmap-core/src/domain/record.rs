//! Index and listing records.

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::package::ResolvedPackage;

/// Top-level index file name.
pub const INDEX_FILE: &str = "manifest.txt";

/// Profile cache file name.
pub const PROFILES_FILE: &str = "profiles.json";

/// Extension of listing files.
pub const LISTING_SUFFIX: &str = ".txt";

const LISTING_HASH_LEN: usize = 64;

/// One `(executable, bin_dir)` pair of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub executable: String,
    pub bin_dir: PathBuf,
}

/// One `(manifest_path, listing_file)` pair of the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub manifest_path: PathBuf,
    pub listing_file: String,
}

impl IndexEntry {
    pub fn for_manifest(manifest_path: &Path) -> Self {
        Self {
            manifest_path: manifest_path.to_path_buf(),
            listing_file: listing_file_name(manifest_path),
        }
    }
}

/// A manifest together with its resolved listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestRecord {
    pub manifest_path: PathBuf,
    pub listing_file: String,
    pub entries: Vec<ListingEntry>,
}

impl ManifestRecord {
    /// Build the record for `manifest_path` from resolved packages.
    ///
    /// Entries follow package order, executables sorted within a package.
    /// `launcher` is left out.
    pub fn from_packages(manifest_path: &Path, packages: &[ResolvedPackage], launcher: &str) -> Self {
        let entries = packages
            .iter()
            .flat_map(|package| {
                package
                    .executables
                    .iter()
                    .filter(|name| name.as_str() != launcher)
                    .map(|name| ListingEntry {
                        executable: name.clone(),
                        bin_dir: package.bin_dir.clone(),
                    })
            })
            .collect();

        Self {
            manifest_path: manifest_path.to_path_buf(),
            listing_file: listing_file_name(manifest_path),
            entries,
        }
    }

    pub fn index_entry(&self) -> IndexEntry {
        IndexEntry {
            manifest_path: self.manifest_path.clone(),
            listing_file: self.listing_file.clone(),
        }
    }
}

/// Listing file name for a manifest: lowercase hex SHA-256 of the path plus `.txt`.
pub fn listing_file_name(manifest_path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(manifest_path.as_os_str().as_encoded_bytes());
    format!("{:x}{LISTING_SUFFIX}", hasher.finalize())
}

/// Whether a file name has the shape of a listing file.
pub fn is_listing_name(name: &str) -> bool {
    name.strip_suffix(LISTING_SUFFIX).is_some_and(|stem| {
        stem.len() == LISTING_HASH_LEN
            && stem
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    })
}
