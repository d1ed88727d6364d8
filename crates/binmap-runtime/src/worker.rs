//! `PackageResolver` backed by a disposable worker process.
//!
//! The external resolver may load arbitrary project code that changes its
//! process for good, so each manifest is resolved in a fresh child. The child
//! prints the package list as JSON; the parent only reads it.

use std::io;
use std::path::Path;

use async_trait::async_trait;
use binmap_core::{
    BundleSettings, ChildEnv, PackageResolver, RehashConfig, ResolutionOutcome, ResolveError,
    ResolvedPackage, ResolverEnv, RuntimeProfile, check_manifest, shared_search_roots,
    worker_runtime,
};
use tracing::debug;

use crate::command::{RunError, run_captured, runtime_command};

/// Worker script: resolves `BUNDLE_GEMFILE` and prints the packages as JSON.
pub const RESOLVE_SCRIPT: &str = include_str!("../scripts/resolve.rb");

/// Worker exit status for a manifest that failed to evaluate.
pub const EXIT_MANIFEST_INVALID: i32 = 65;

/// Worker exit status when the resolver library cannot be loaded.
pub const EXIT_RESOLVER_UNAVAILABLE: i32 = 69;

/// Resolves manifests in child processes of the runtime command.
#[derive(Debug, Clone)]
pub struct ProcessResolver {
    config: RehashConfig,
    base_env: ChildEnv,
    host: Option<RuntimeProfile>,
}

impl ProcessResolver {
    /// Resolver whose workers start from the current process environment.
    pub fn new(config: RehashConfig) -> Self {
        Self::with_base_env(config, ChildEnv::capture())
    }

    pub const fn with_base_env(config: RehashConfig, base_env: ChildEnv) -> Self {
        Self {
            config,
            base_env,
            host: None,
        }
    }

    /// Runtime that hosts workers for manifests pinned to an incapable runtime.
    #[must_use]
    pub fn with_host(mut self, host: Option<RuntimeProfile>) -> Self {
        self.host = host;
        self
    }

    pub const fn host(&self) -> Option<&RuntimeProfile> {
        self.host.as_ref()
    }

    /// Environment of the worker resolving `manifest` for `profile`.
    pub fn worker_env(
        &self,
        manifest: &Path,
        profile: &RuntimeProfile,
        worker: &RuntimeProfile,
    ) -> Result<ChildEnv, ResolveError> {
        let project_dir = manifest.parent().unwrap_or(manifest);
        let settings = BundleSettings::load(project_dir, &self.base_env, self.config.home());
        let roots = shared_search_roots(profile, &self.config);
        let resolver_env = ResolverEnv::for_profile(manifest, profile, &settings, &roots);

        let mut env = self.base_env.for_runtime(&worker.version_id, &self.config);
        resolver_env
            .apply(&mut env, &self.config.resolver_vars)
            .map_err(|e| {
                ResolveError::ResolutionFailed(format!("invalid package search path: {e}"))
            })?;
        Ok(env)
    }
}

#[async_trait]
impl PackageResolver for ProcessResolver {
    async fn resolve(&self, manifest: &Path, profile: &RuntimeProfile) -> ResolutionOutcome {
        check_manifest(manifest)?;

        let worker = worker_runtime(profile, self.host.as_ref(), &self.config.min_host_version)
            .ok_or_else(|| {
                ResolveError::ResolverUnavailable(format!(
                    "{} is older than the minimum host runtime and no capable runtime is installed",
                    profile.version_id
                ))
            })?;

        let env = self.worker_env(manifest, profile, worker)?;
        let cmd = runtime_command(
            &self.config.runtime_command,
            RESOLVE_SCRIPT,
            &env,
            manifest.parent(),
        );
        let label = format!("resolve {}", manifest.display());
        debug!(
            manifest = %manifest.display(),
            profile = %profile.version_id,
            worker = %worker.version_id,
            "Starting resolver worker"
        );

        let captured = run_captured(cmd, &label, self.config.resolve_timeout())
            .await
            .map_err(|e| match e {
                RunError::Spawn(source) if source.kind() == io::ErrorKind::NotFound => {
                    ResolveError::ResolverUnavailable(format!(
                        "cannot run {}: {source}",
                        self.config.runtime_command
                    ))
                }
                other => ResolveError::ResolutionFailed(other.to_string()),
            })?;

        match captured.status.code() {
            Some(0) => parse_packages(&captured.stdout),
            Some(EXIT_MANIFEST_INVALID) => Err(ResolveError::ManifestInvalid {
                path: manifest.to_path_buf(),
                reason: "manifest failed to evaluate".to_string(),
            }),
            Some(EXIT_RESOLVER_UNAVAILABLE) => Err(ResolveError::ResolverUnavailable(format!(
                "resolver cannot be loaded by {}",
                worker.version_id
            ))),
            _ => Err(ResolveError::ResolutionFailed(format!(
                "worker exited with {}",
                captured.status
            ))),
        }
    }
}

/// Parse worker stdout. Blank output is an empty resolution.
pub fn parse_packages(stdout: &str) -> ResolutionOutcome {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str::<Vec<ResolvedPackage>>(stdout.trim())
        .map_err(|e| ResolveError::ResolutionFailed(format!("unreadable worker output: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn blank_output_is_empty_resolution() {
        assert_eq!(parse_packages("").unwrap(), Vec::new());
        assert_eq!(parse_packages("\n").unwrap(), Vec::new());
    }

    #[test]
    fn parses_packages_without_executables() {
        let packages = parse_packages(concat!(
            r#"[{"bin_dir":"/gems/rake/exe","executables":["rake"]},"#,
            r#"{"bin_dir":"/gems/json/bin"}]"#
        ))
        .unwrap();
        assert_eq!(packages.len(), 2);
        assert_eq!(packages[0].bin_dir, PathBuf::from("/gems/rake/exe"));
        assert!(packages[1].executables.is_empty());
    }

    #[test]
    fn garbage_output_fails_resolution() {
        let err = parse_packages("Fetching gem metadata...").unwrap_err();
        assert!(matches!(err, ResolveError::ResolutionFailed(_)));
    }

    #[test]
    fn scripts_are_embedded() {
        assert!(crate::PROBE_SCRIPT.contains("RUBY_VERSION"));
        assert!(RESOLVE_SCRIPT.contains("Bundler::Definition.build"));
    }
}
