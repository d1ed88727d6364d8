//! Rehash configuration.
//!
//! Every file name, environment variable and command the pipeline relies on
//! lives here, with defaults for an rbenv + Bundler installation. Values are
//! read through a lookup function so callers (and tests) decide where they
//! come from; `from_env` reads the process environment.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Runtime command used for probing and for resolver workers.
pub const DEFAULT_RUNTIME_COMMAND: &str = "ruby";

/// Default worker timeout in seconds.
pub const DEFAULT_RESOLVE_TIMEOUT_SECS: u64 = 600;

/// Default probe timeout in seconds.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;

/// Errors raised while building or validating a [`RehashConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither `RBENV_ROOT` nor a home directory is available.
    #[error("Cannot determine the runtime root: set RBENV_ROOT")]
    NoRuntimeRoot,

    /// A variable holds a value that cannot be parsed.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    /// A required name is empty.
    #[error("Configuration field `{0}` must not be empty")]
    Empty(&'static str),
}

/// Names of the variables the external resolver reads its targets from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverVars {
    /// Manifest location override.
    pub manifest: String,
    /// Package home override.
    pub home: String,
    /// Package search path override.
    pub search_path: String,
}

impl Default for ResolverVars {
    fn default() -> Self {
        Self {
            manifest: "BUNDLE_GEMFILE".to_string(),
            home: "GEM_HOME".to_string(),
            search_path: "GEM_PATH".to_string(),
        }
    }
}

/// Configuration for one rehash run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RehashConfig {
    /// Root of the version manager (`$RBENV_ROOT`).
    pub runtime_root: PathBuf,
    /// Command that runs the probe and worker scripts.
    pub runtime_command: String,
    /// User home, used for the user package root and global bundle settings.
    pub home_dir: Option<PathBuf>,
    /// Version pin file names, checked in order at each directory level.
    pub version_files: Vec<String>,
    /// Global pin file name under `runtime_root`.
    pub global_version_file: String,
    /// Manifest file name.
    pub manifest_file: String,
    /// The resolver's own launcher; never written to a listing.
    pub launcher: String,
    /// Variable that selects the runtime version for a child process.
    pub selector_var: String,
    /// Variables removed from every child environment.
    pub cleared_vars: Vec<String>,
    /// Resolver target variables.
    pub resolver_vars: ResolverVars,
    /// Extra shared package roots searched after the profile's own.
    pub search_roots: Vec<PathBuf>,
    /// Lowest runtime version able to host a resolver worker.
    pub min_host_version: Vec<u32>,
    /// Probe timeout in seconds, 0 disables.
    pub probe_timeout_secs: u64,
    /// Worker timeout in seconds, 0 disables.
    pub resolve_timeout_secs: u64,
}

impl RehashConfig {
    /// Create a configuration rooted at `runtime_root` with default names.
    pub fn new(runtime_root: impl Into<PathBuf>) -> Self {
        Self {
            runtime_root: runtime_root.into(),
            runtime_command: DEFAULT_RUNTIME_COMMAND.to_string(),
            home_dir: None,
            version_files: vec![".ruby-version".to_string(), ".rbenv-version".to_string()],
            global_version_file: "version".to_string(),
            manifest_file: "Gemfile".to_string(),
            launcher: "bundle".to_string(),
            selector_var: "RBENV_VERSION".to_string(),
            cleared_vars: vec![
                "PWD".to_string(),
                "RBENV_DIR".to_string(),
                "RBENV_HOOK_PATH".to_string(),
            ],
            resolver_vars: ResolverVars::default(),
            search_roots: Vec::new(),
            min_host_version: vec![1, 9],
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            resolve_timeout_secs: DEFAULT_RESOLVE_TIMEOUT_SECS,
        }
    }

    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// Recognized variables:
    /// - `HOME`, falling back to the platform home directory
    /// - `RBENV_ROOT` (default `~/.rbenv`)
    /// - `BINMAP_RUNTIME_COMMAND`
    /// - `BINMAP_RESOLVE_TIMEOUT_SECS`, `BINMAP_PROBE_TIMEOUT_SECS`
    /// - `BINMAP_SEARCH_ROOTS` (platform path list)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let home_dir = non_empty("HOME")
            .map(PathBuf::from)
            .or_else(dirs::home_dir);

        let runtime_root = match non_empty("RBENV_ROOT") {
            Some(root) => PathBuf::from(root),
            None => home_dir
                .as_ref()
                .map(|home| home.join(".rbenv"))
                .ok_or(ConfigError::NoRuntimeRoot)?,
        };

        let mut config = Self::new(runtime_root);
        config.home_dir = home_dir;

        if let Some(command) = non_empty("BINMAP_RUNTIME_COMMAND") {
            config.runtime_command = command.to_string_lossy().into_owned();
        }
        if let Some(value) = non_empty("BINMAP_RESOLVE_TIMEOUT_SECS") {
            config.resolve_timeout_secs = parse_secs("BINMAP_RESOLVE_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = non_empty("BINMAP_PROBE_TIMEOUT_SECS") {
            config.probe_timeout_secs = parse_secs("BINMAP_PROBE_TIMEOUT_SECS", &value)?;
        }
        if let Some(roots) = non_empty("BINMAP_SEARCH_ROOTS") {
            config.search_roots = std::env::split_paths(&roots)
                .filter(|root| !root.as_os_str().is_empty())
                .collect();
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot drive a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("runtime_command", self.runtime_command.as_str()),
            ("global_version_file", self.global_version_file.as_str()),
            ("manifest_file", self.manifest_file.as_str()),
            ("launcher", self.launcher.as_str()),
            ("selector_var", self.selector_var.as_str()),
            ("resolver_vars.manifest", self.resolver_vars.manifest.as_str()),
            ("resolver_vars.home", self.resolver_vars.home.as_str()),
            ("resolver_vars.search_path", self.resolver_vars.search_path.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(field));
            }
        }
        if self.version_files.iter().all(|name| name.trim().is_empty()) {
            return Err(ConfigError::Empty("version_files"));
        }
        Ok(())
    }

    /// Directory holding one subdirectory per installed runtime version.
    pub fn versions_dir(&self) -> PathBuf {
        self.runtime_root.join("versions")
    }

    /// The global version pin file.
    pub fn global_version_path(&self) -> PathBuf {
        self.runtime_root.join(&self.global_version_file)
    }

    /// Home directory, if known.
    pub fn home(&self) -> Option<&Path> {
        self.home_dir.as_deref()
    }

    pub fn probe_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.probe_timeout_secs)
    }

    pub fn resolve_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.resolve_timeout_secs)
    }
}

impl fmt::Display for RehashConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "runtime_root = {}", self.runtime_root.display())?;
        writeln!(f, "versions_dir = {}", self.versions_dir().display())?;
        writeln!(f, "global_version_file = {}", self.global_version_path().display())?;
        writeln!(f, "runtime_command = {}", self.runtime_command)?;
        writeln!(f, "manifest_file = {}", self.manifest_file)?;
        writeln!(f, "version_files = {}", self.version_files.join(", "))?;
        let roots: Vec<String> = self
            .search_roots
            .iter()
            .map(|root| root.display().to_string())
            .collect();
        writeln!(f, "search_roots = {}", roots.join(", "))?;
        writeln!(f, "probe_timeout_secs = {}", self.probe_timeout_secs)?;
        write!(f, "resolve_timeout_secs = {}", self.resolve_timeout_secs)
    }
}

fn parse_secs(key: &'static str, value: &OsString) -> Result<u64, ConfigError> {
    let text = value.to_string_lossy();
    text.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidValue {
            key,
            value: text.into_owned(),
        })
}

const fn non_zero_secs(secs: u64) -> Option<Duration> {
    if secs == 0 {
        None
    } else {
        Some(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<OsString> {
        let map: HashMap<String, OsString> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), OsString::from(*v)))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn runtime_root_defaults_under_home() {
        let config = RehashConfig::from_lookup(lookup_from(&[("HOME", "/home/dev")])).unwrap();
        assert_eq!(config.runtime_root, PathBuf::from("/home/dev/.rbenv"));
        assert_eq!(config.versions_dir(), PathBuf::from("/home/dev/.rbenv/versions"));
        assert_eq!(
            config.global_version_path(),
            PathBuf::from("/home/dev/.rbenv/version")
        );
    }

    #[test]
    fn explicit_runtime_root_wins() {
        let config = RehashConfig::from_lookup(lookup_from(&[
            ("HOME", "/home/dev"),
            ("RBENV_ROOT", "/opt/rbenv"),
        ]))
        .unwrap();
        assert_eq!(config.runtime_root, PathBuf::from("/opt/rbenv"));
    }

    #[test]
    fn timeouts_parse_and_zero_disables() {
        let config = RehashConfig::from_lookup(lookup_from(&[
            ("RBENV_ROOT", "/opt/rbenv"),
            ("BINMAP_RESOLVE_TIMEOUT_SECS", "0"),
            ("BINMAP_PROBE_TIMEOUT_SECS", " 5 "),
        ]))
        .unwrap();
        assert_eq!(config.resolve_timeout(), None);
        assert_eq!(config.probe_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = RehashConfig::from_lookup(lookup_from(&[
            ("RBENV_ROOT", "/opt/rbenv"),
            ("BINMAP_RESOLVE_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "BINMAP_RESOLVE_TIMEOUT_SECS",
                ..
            }
        ));
    }

    #[test]
    fn search_roots_split_and_drop_empties() {
        let joined = std::env::join_paths(["/a/gems", "", "/b/gems"]).unwrap();
        let joined = joined.to_string_lossy().into_owned();
        let config = RehashConfig::from_lookup(lookup_from(&[
            ("RBENV_ROOT", "/opt/rbenv"),
            ("BINMAP_SEARCH_ROOTS", joined.as_str()),
        ]))
        .unwrap();
        assert_eq!(
            config.search_roots,
            vec![PathBuf::from("/a/gems"), PathBuf::from("/b/gems")]
        );
    }

    #[test]
    fn empty_launcher_fails_validation() {
        let mut config = RehashConfig::new("/opt/rbenv");
        config.launcher = "  ".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Empty("launcher"))));
    }

    #[test]
    fn display_lists_key_value_pairs() {
        let output = RehashConfig::new("/opt/rbenv").to_string();
        assert!(output.contains("runtime_root = /opt/rbenv"));
        assert!(output.contains("manifest_file = Gemfile"));
        assert!(output.contains("resolve_timeout_secs = 600"));
    }
}
