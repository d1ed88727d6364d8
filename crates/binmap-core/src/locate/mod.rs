//! Upward directory walks for version pins and manifests.
//!
//! Both locators start at a directory and check it and every ancestor up to
//! and including the filesystem root. Nothing found is a normal result.

mod manifest;
mod version;

pub use manifest::find_manifest;
pub use version::{find_version, read_pin};
