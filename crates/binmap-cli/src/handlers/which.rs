//! Which command handler.

use std::path::Path;

use anyhow::Result;
use binmap_core::lookup;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Print where `executable` lives for the project containing `dir`.
pub fn execute(ctx: &CliContext, executable: &str, dir: &Path) -> Result<()> {
    match lookup(&ctx.layout, &ctx.config, dir, executable).map_err(CliError::core)? {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => Err(CliError::NotFound(format!(
            "{executable}: not provided by the project at {}",
            dir.display()
        ))
        .into()),
    }
}
