//! Process adapters for binmap.
//!
//! Implements the core ports by running the configured runtime command with
//! an embedded script:
//! - `CommandProber` asks one runtime version to describe itself
//! - `ProcessResolver` resolves a manifest in a disposable worker process
//!
//! Every child gets its environment from a [`binmap_core::ChildEnv`]
//! snapshot; this crate never writes the environment of its own process.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod command;
mod probe;
mod worker;

pub use probe::{CommandProber, PROBE_SCRIPT};
pub use worker::{
    EXIT_MANIFEST_INVALID, EXIT_RESOLVER_UNAVAILABLE, ProcessResolver, RESOLVE_SCRIPT,
    parse_packages,
};

#[cfg(test)]
use tempfile as _;
