//! The `binmap` command line adapter.
//!
//! `main.rs` parses arguments and hands off to [`bootstrap`], which wires the
//! runtime adapters into a [`CliContext`]; handlers do the rest.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use tempfile as _;

// Used by main.rs only
use dotenvy as _;
use tokio as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod parser;

pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use error::{CliError, exit_code_for};
pub use logging::init_tracing;
pub use parser::Cli;
