//! Child process environments.
//!
//! Every child binmap spawns gets its environment from a `ChildEnv`: a
//! snapshot of the ambient variables that is edited in memory and then handed
//! to the child whole (`env_clear` + `envs`). The orchestrating process's own
//! environment is only ever read.

use std::collections::BTreeMap;
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::config::RehashConfig;

const PATH_VAR: &str = "PATH";

/// An owned set of environment variables for a child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildEnv {
    vars: BTreeMap<OsString, OsString>,
}

impl ChildEnv {
    /// Snapshot the current process environment.
    pub fn capture() -> Self {
        Self::from_vars(env::vars_os())
    }

    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<OsString>,
        V: Into<OsString>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(OsString::as_os_str)
    }

    pub fn set(&mut self, key: impl Into<OsString>, value: impl Into<OsString>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: impl AsRef<OsStr>) -> Option<OsString> {
        self.vars.remove(key.as_ref())
    }

    pub fn contains(&self, key: impl AsRef<OsStr>) -> bool {
        self.vars.contains_key(key.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Drop the leading `PATH` entry if it is a runtime's bin directory under `versions_dir`.
    ///
    /// The version manager prepends the active runtime's bin directory when it
    /// launches binmap; left in place, it would shadow the version selected for
    /// a child.
    pub fn trim_runtime_bin_from_path(&mut self, versions_dir: &Path) {
        let Some(path) = self.get(PATH_VAR) else {
            return;
        };
        let mut entries: Vec<PathBuf> = env::split_paths(path).collect();
        let Some(first) = entries.first() else {
            return;
        };
        if !first.starts_with(versions_dir) {
            return;
        }
        entries.remove(0);
        if let Ok(joined) = env::join_paths(entries) {
            self.set(PATH_VAR, joined);
        }
    }

    /// Environment for a child that must run under `version_id`.
    pub fn for_runtime(&self, version_id: &str, config: &RehashConfig) -> Self {
        let mut child = self.clone();
        for var in &config.cleared_vars {
            child.remove(var);
        }
        child.trim_runtime_bin_from_path(&config.versions_dir());
        child.set(&config.selector_var, version_id);
        child
    }
}

impl<'a> IntoIterator for &'a ChildEnv {
    type Item = (&'a OsString, &'a OsString);
    type IntoIter = std::collections::btree_map::Iter<'a, OsString, OsString>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}
