//! Rehash command handler.

use std::path::PathBuf;

use anyhow::Result;
use binmap_core::{ManifestSet, RehashSummary, read_index, verify_output_dir};
use tracing::warn;

use crate::bootstrap::CliContext;
use crate::error::CliError;

/// Rebuild the index for `dirs`, or with `refresh` update just those entries
/// and keep the rest of the previous index.
pub async fn execute(ctx: &CliContext, refresh: bool, dirs: &[PathBuf]) -> Result<()> {
    let summary = run(ctx, refresh, dirs).await?;
    println!("{summary}");
    Ok(())
}

pub async fn run(ctx: &CliContext, refresh: bool, dirs: &[PathBuf]) -> Result<RehashSummary> {
    // Checked here so a missing directory fails before profiles.json is written.
    verify_output_dir(ctx.layout.root()).map_err(CliError::core)?;

    let profiles = ctx.load_profiles().await?;

    let mut manifests =
        ManifestSet::discover(dirs, &ctx.config.manifest_file).map_err(CliError::core)?;
    if refresh {
        manifests.seed_from_index(read_index(&ctx.layout).map_err(CliError::core)?);
    }

    let resolver = ctx.resolver_for(&profiles);
    if resolver.host().is_none() {
        warn!(
            "No installed runtime can host the resolver; manifests pinned to older versions will fail"
        );
    }

    let summary = ctx
        .cache()
        .rehash(&profiles, manifests, &resolver)
        .await
        .map_err(CliError::core)?;
    Ok(summary)
}
