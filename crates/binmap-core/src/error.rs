//! Crate-level error aggregation.

use thiserror::Error;

use crate::cache::CacheError;
use crate::config::ConfigError;
use crate::paths::PathError;
use crate::profiles::StoreError;

/// Any error binmap-core can return to a caller.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}
