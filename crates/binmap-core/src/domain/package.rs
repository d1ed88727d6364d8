//! Resolver output.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ports::ResolveError;

/// One activated package, reduced to what the listing needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPackage {
    pub bin_dir: PathBuf,
    #[serde(default)]
    pub executables: BTreeSet<String>,
}

impl ResolvedPackage {
    pub fn new<I, S>(bin_dir: impl Into<PathBuf>, executables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            bin_dir: bin_dir.into(),
            executables: executables.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of resolving one manifest.
pub type ResolutionOutcome = Result<Vec<ResolvedPackage>, ResolveError>;
