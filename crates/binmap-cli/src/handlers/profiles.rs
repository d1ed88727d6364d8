//! Profiles command handler.

use std::fmt::Write as _;

use anyhow::Result;
use binmap_core::{ProfileMap, select_host_runtime, verify_output_dir};

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Refresh the profile cache and print one line per runtime.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    verify_output_dir(ctx.layout.root()).map_err(CliError::core)?;
    let profiles = ctx.load_profiles().await?;
    print!("{}", render(&profiles, &ctx.config.min_host_version));
    Ok(())
}

/// `version  semver  engine/abi  package_root` with markers for the resolver
/// host (`*`) and for profiles whose package root is gone.
pub fn render(profiles: &ProfileMap, min_host_version: &[u32]) -> String {
    let host = select_host_runtime(profiles, min_host_version).map(|p| p.version_id.as_str());
    let width = profiles.keys().map(String::len).max().unwrap_or(0);

    let mut out = String::new();
    for profile in profiles.values() {
        let marker = if host == Some(profile.version_id.as_str()) { '*' } else { ' ' };
        let semver: Vec<String> = profile.semantic_version.iter().map(u32::to_string).collect();
        let _ = write!(
            out,
            "{marker} {:<width$}  {:<8}  {}/{}  {}",
            profile.version_id,
            semver.join("."),
            profile.engine_name,
            profile.engine_version,
            profile.package_root.display(),
        );
        if !profile.is_usable() {
            out.push_str(" (missing)");
        }
        out.push('\n');
    }
    out
}
