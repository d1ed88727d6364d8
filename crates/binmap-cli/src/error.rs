//! CLI-specific error types and mappings.
//!
//! Maps core errors to exit codes and user-facing messages.

use binmap_core::{CacheError, CoreError, PathError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A path argument cannot be used.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error, including an unusable output directory.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No runtime can run the resolver.
    #[error("Resolver unavailable: {0}")]
    Unavailable(String),

    /// Lookup found nothing.
    #[error("{0}")]
    NotFound(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// - 1: Lookup miss
    /// - 2: Invalid arguments
    /// - 64-78: sysexits.h categories
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound(_) => 1,
            Self::Arguments(_) => 2,
            Self::Unavailable(_) => 69, // EX_UNAVAILABLE
            Self::Io(_) => 74,          // EX_IOERR
            Self::Config(_) => 78,      // EX_CONFIG
        }
    }

    /// Map any error from `binmap-core` through [`CoreError`].
    pub fn core(err: impl Into<CoreError>) -> Self {
        Self::from(err.into())
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Config(e) => Self::Config(e.to_string()),
            CoreError::Path(e) | CoreError::Cache(CacheError::OutputDir(e)) => output_dir(&e),
            CoreError::Store(e) => Self::Io(e.to_string()),
            CoreError::Cache(CacheError::InvalidPath(e)) => Self::Arguments(e.to_string()),
            CoreError::Cache(CacheError::ResolverUnavailable(msg)) => Self::Unavailable(msg),
            CoreError::Cache(io @ CacheError::Io { .. }) => Self::Io(io.to_string()),
        }
    }
}

fn output_dir(err: &PathError) -> CliError {
    CliError::Config(format!("output directory unusable: {err}"))
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Exit code for an error returned from `main`: the first `CliError` in its
/// chain decides, anything else is a general error.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CliError>())
        .map_or(1, |cli| u8::try_from(cli.exit_code()).unwrap_or(1))
}
