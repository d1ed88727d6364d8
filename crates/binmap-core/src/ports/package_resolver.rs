//! Package resolver port.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{ResolutionOutcome, RuntimeProfile};

/// Typed failure of one resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No runtime can host the resolver. Fatal for the whole run.
    #[error("Resolver unavailable: {0}")]
    ResolverUnavailable(String),

    /// The manifest cannot be read or evaluated.
    #[error("Invalid manifest {}: {reason}", path.display())]
    ManifestInvalid { path: PathBuf, reason: String },

    /// The resolver ran and failed.
    #[error("Resolution failed: {0}")]
    ResolutionFailed(String),
}

impl ResolveError {
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::ResolverUnavailable(_))
    }
}

/// Resolves the packages a manifest activates under a runtime profile.
///
/// Implementations must leave the calling process's environment untouched on
/// every path, success or failure.
#[async_trait]
pub trait PackageResolver: Send + Sync {
    async fn resolve(&self, manifest: &Path, profile: &RuntimeProfile) -> ResolutionOutcome;
}
