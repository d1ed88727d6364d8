//! Core domain for binmap.
//!
//! binmap maps executable names to the directories that provide them for every
//! project manifest it is pointed at, so a shell dispatcher can find the
//! project-local executable without running the dependency resolver on each
//! command.
//!
//! This crate owns the pure parts of that pipeline:
//! - locating version pin files and manifests (`locate`)
//! - the runtime profile cache (`profiles`)
//! - deriving the resolver environment for a profile (`resolve`)
//! - the on-disk index and listing files (`cache`)
//!
//! Process execution lives behind the traits in `ports`; the implementations
//! are in `binmap-runtime`.

#![deny(unused_crate_dependencies)]

pub mod cache;
pub mod config;
pub mod domain;
pub mod env;
pub mod error;
pub mod locate;
pub mod paths;
pub mod ports;
pub mod profiles;
pub mod resolve;

pub use cache::{
    CacheError, Candidate, ManifestCache, ManifestSet, RehashSummary, lookup, read_index,
    read_listing,
};
pub use config::{ConfigError, RehashConfig, ResolverVars};
pub use domain::{
    INDEX_FILE, IndexEntry, LISTING_SUFFIX, ListingEntry, ManifestRecord, PROFILES_FILE,
    ProfileMap, ResolutionOutcome, ResolvedPackage, RuntimeProfile, SYSTEM_VERSION,
    listing_file_name,
};
pub use env::ChildEnv;
pub use error::CoreError;
pub use locate::{find_manifest, find_version};
pub use paths::{OutputLayout, PathError, verify_output_dir};
pub use ports::{PackageResolver, ProbeError, ResolveError, RuntimeProber};
pub use profiles::{ProfileStore, StoreError};
pub use resolve::{
    BundleSettings, ResolverEnv, check_manifest, select_host_runtime, shared_search_roots,
    worker_runtime,
};

#[cfg(test)]
use mockall as _;
#[cfg(test)]
use tempfile as _;
#[cfg(test)]
use tokio as _;
