//! Command handlers.
//!
//! Each handler takes the [`CliContext`](crate::bootstrap::CliContext) and
//! the parsed arguments for its command.

pub mod paths;
pub mod profiles;
pub mod rehash;
pub mod which;
