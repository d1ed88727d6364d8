//! Runtime prober port.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::RuntimeProfile;

/// Errors from probing one runtime version.
///
/// All of them are recoverable: the version is left out of the profile map
/// and probed again on the next run.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The runtime command could not be started.
    #[error("Failed to start probe for {version_id}: {reason}")]
    Spawn { version_id: String, reason: String },

    /// The probe printed something but exited unsuccessfully.
    #[error("Probe for {version_id} exited with {status}")]
    Failed { version_id: String, status: String },

    /// The probe output could not be parsed.
    #[error("Unexpected probe output for {version_id}: {reason}")]
    Malformed { version_id: String, reason: String },

    /// The probe did not finish in time.
    #[error("Probe for {version_id} timed out after {secs}s")]
    TimedOut { version_id: String, secs: u64 },
}

/// Asks one installed runtime version to describe itself.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RuntimeProber: Send + Sync {
    /// Probe `version_id`.
    ///
    /// Returns `Ok(None)` when the version manager has no such version (the
    /// probe printed nothing).
    async fn probe(&self, version_id: &str) -> Result<Option<RuntimeProfile>, ProbeError>;
}
