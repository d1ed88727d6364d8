//! Names of the artifacts inside the output directory.

use std::path::{Path, PathBuf};

use crate::domain::{INDEX_FILE, PROFILES_FILE};

/// The output directory and the files binmap keeps in it.
///
/// ```text
/// <out_dir>/
///   manifest.txt        index: manifest path / listing file name pairs
///   profiles.json       runtime profile cache
///   <sha256>.txt        one listing per indexed manifest
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE)
    }

    pub fn profiles_path(&self) -> PathBuf {
        self.root.join(PROFILES_FILE)
    }

    pub fn listing_path(&self, listing_file: &str) -> PathBuf {
        self.root.join(listing_file)
    }
}
