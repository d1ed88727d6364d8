//! Domain types shared by the store, the resolver and the cache.

mod package;
mod profile;
mod record;

pub use package::{ResolutionOutcome, ResolvedPackage};
pub use profile::{ProfileMap, RuntimeProfile, SYSTEM_VERSION, parse_semantic_version};
pub use record::{
    INDEX_FILE, IndexEntry, LISTING_SUFFIX, ListingEntry, ManifestRecord, PROFILES_FILE,
    is_listing_name, listing_file_name,
};
