//! Listing file reading and writing.

use std::fs;
use std::io;
use std::path::PathBuf;

use super::CacheError;
use crate::domain::{ListingEntry, ManifestRecord};
use crate::paths::{OutputLayout, write_atomic};

/// Listing content for a record: `executable\nbin_dir\n` per entry.
pub fn render_listing(record: &ManifestRecord) -> String {
    record
        .entries
        .iter()
        .map(|entry| format!("{}\n{}\n", entry.executable, entry.bin_dir.display()))
        .collect()
}

/// Write the record's listing file atomically.
pub fn write_listing(layout: &OutputLayout, record: &ManifestRecord) -> Result<(), CacheError> {
    let path = layout.listing_path(&record.listing_file);
    write_atomic(&path, render_listing(record).as_bytes()).map_err(CacheError::io("write", &path))
}

/// Read a listing file. A missing file is `None`.
pub fn read_listing(
    layout: &OutputLayout,
    listing_file: &str,
) -> Result<Option<Vec<ListingEntry>>, CacheError> {
    let path = layout.listing_path(listing_file);
    match fs::read_to_string(&path) {
        Ok(content) => Ok(Some(parse_listing(&content))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CacheError::io("read", &path)(e)),
    }
}

pub fn parse_listing(content: &str) -> Vec<ListingEntry> {
    let lines: Vec<&str> = content.lines().filter(|line| !line.is_empty()).collect();
    lines
        .chunks_exact(2)
        .map(|pair| ListingEntry {
            executable: pair[0].to_string(),
            bin_dir: PathBuf::from(pair[1]),
        })
        .collect()
}
