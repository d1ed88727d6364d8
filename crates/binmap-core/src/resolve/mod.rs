//! Everything a resolver worker needs decided before it is spawned.
//!
//! - `BundleSettings`: the project's bundle path and shared-package switch
//! - `ResolverEnv`: the resolver target variables derived from a profile
//! - `capability`: which runtime hosts the worker

mod bundle_settings;
mod capability;
mod env;

use std::fs;
use std::path::Path;

pub use bundle_settings::BundleSettings;
pub use capability::{select_host_runtime, worker_runtime};
pub use env::{ResolverEnv, shared_search_roots};

use crate::ports::ResolveError;

/// Reject a manifest that cannot be read as UTF-8 text.
///
/// Runs before any worker is spawned.
pub fn check_manifest(path: &Path) -> Result<(), ResolveError> {
    let bytes = fs::read(path).map_err(|e| ResolveError::ManifestInvalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    std::str::from_utf8(&bytes).map_err(|e| ResolveError::ManifestInvalid {
        path: path.to_path_buf(),
        reason: format!("not valid UTF-8: {e}"),
    })?;
    Ok(())
}
