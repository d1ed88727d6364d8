//! Paths command handler.

use anyhow::Result;

use crate::bootstrap::CliContext;

pub fn execute(ctx: &CliContext) -> Result<()> {
    println!("{}", render(ctx));
    Ok(())
}

/// Configuration followed by the output file locations.
pub fn render(ctx: &CliContext) -> String {
    format!(
        "{}\nout_dir = {}\nindex = {}\nprofiles = {}",
        ctx.config,
        ctx.layout.root().display(),
        ctx.layout.index_path().display(),
        ctx.layout.profiles_path().display(),
    )
}
