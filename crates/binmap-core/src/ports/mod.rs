//! Port definitions for the external processes binmap drives.
//!
//! Core owns the traits and their error types; `binmap-runtime` implements
//! them by spawning the runtime command. Nothing here spawns a process.

mod package_resolver;
mod runtime_prober;

pub use package_resolver::{PackageResolver, ResolveError};
#[cfg(test)]
pub use runtime_prober::MockRuntimeProber;
pub use runtime_prober::{ProbeError, RuntimeProber};
