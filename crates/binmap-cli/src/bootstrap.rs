//! Composition root for the CLI.
//!
//! Reads configuration, then wires the process adapters from
//! `binmap-runtime` behind the core ports.

use std::path::PathBuf;
use std::sync::Arc;

use binmap_core::{
    ManifestCache, OutputLayout, ProfileMap, ProfileStore, RehashConfig, RuntimeProber,
    select_host_runtime,
};
use binmap_runtime::{CommandProber, ProcessResolver};

use crate::error::CliError;

/// Inputs needed to bootstrap the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Output directory from `--out-dir`.
    pub out_dir: PathBuf,
    pub rehash: RehashConfig,
}

impl CliConfig {
    /// Read the rehash configuration from the process environment.
    pub fn from_env(out_dir: PathBuf) -> Result<Self, CliError> {
        let rehash = RehashConfig::from_env().map_err(CliError::core)?;
        Ok(Self { out_dir, rehash })
    }
}

/// Everything a handler needs.
pub struct CliContext {
    pub config: RehashConfig,
    pub layout: OutputLayout,
    pub prober: Arc<dyn RuntimeProber>,
}

impl CliContext {
    /// Profile cache stored alongside the index.
    pub fn profile_store(&self) -> ProfileStore {
        ProfileStore::new(self.layout.profiles_path(), self.config.versions_dir())
    }

    /// Load the profile cache, probing any newly installed versions.
    pub async fn load_profiles(&self) -> Result<ProfileMap, CliError> {
        self.profile_store()
            .build(self.prober.as_ref())
            .await
            .map_err(CliError::core)
    }

    /// Worker-backed resolver with the host runtime picked from `profiles`.
    pub fn resolver_for(&self, profiles: &ProfileMap) -> ProcessResolver {
        let host = select_host_runtime(profiles, &self.config.min_host_version).cloned();
        ProcessResolver::new(self.config.clone()).with_host(host)
    }

    pub fn cache(&self) -> ManifestCache {
        ManifestCache::new(self.layout.clone(), self.config.clone())
    }
}

/// Build the CLI context with the process-backed prober.
pub fn bootstrap(config: CliConfig) -> CliContext {
    let prober: Arc<dyn RuntimeProber> = Arc::new(CommandProber::new(config.rehash.clone()));
    CliContext {
        layout: OutputLayout::new(config.out_dir),
        config: config.rehash,
        prober,
    }
}
