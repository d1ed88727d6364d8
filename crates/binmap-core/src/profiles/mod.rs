//! Runtime profile store.
//!
//! Profiles are cached in `profiles.json` and refreshed entry by entry:
//! a version is probed only when it is installed and missing from the cache,
//! and dropped only when its install directory is gone.

mod store;

pub use store::{ProfileStore, StoreError};
