//! Profile cache persistence and incremental refresh.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{ProfileMap, SYSTEM_VERSION};
use crate::paths::write_atomic;
use crate::ports::RuntimeProber;

/// Errors from reading or writing the profile cache.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to list installed versions in {}: {source}", path.display())]
    Versions {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize profiles: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Owns `profiles.json` and the rules for keeping it current.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    cache_path: PathBuf,
    versions_dir: PathBuf,
}

impl ProfileStore {
    pub fn new(cache_path: impl Into<PathBuf>, versions_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: cache_path.into(),
            versions_dir: versions_dir.into(),
        }
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Load the cached map. A missing file is an empty map; so is a corrupt one.
    pub fn load(&self) -> Result<ProfileMap, StoreError> {
        let content = match fs::read_to_string(&self.cache_path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(ProfileMap::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.cache_path.clone(),
                    source,
                });
            }
        };

        match serde_json::from_str(&content) {
            Ok(map) => Ok(map),
            Err(e) => {
                warn!(
                    path = %self.cache_path.display(),
                    error = %e,
                    "Ignoring corrupt profile cache"
                );
                Ok(ProfileMap::new())
            }
        }
    }

    /// Write the map atomically.
    pub fn save(&self, profiles: &ProfileMap) -> Result<(), StoreError> {
        let mut json = serde_json::to_string_pretty(profiles)?;
        json.push('\n');
        write_atomic(&self.cache_path, json.as_bytes()).map_err(|source| StoreError::Write {
            path: self.cache_path.clone(),
            source,
        })
    }

    /// Installed version ids, sorted. A missing versions directory means none.
    pub fn installed_versions(&self) -> Result<Vec<String>, StoreError> {
        let entries = match fs::read_dir(&self.versions_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Versions {
                    path: self.versions_dir.clone(),
                    source,
                });
            }
        };

        let mut versions: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| !name.starts_with('.'))
            .collect();
        versions.sort();
        Ok(versions)
    }

    /// Bring the cached map up to date and persist it if anything changed.
    ///
    /// Only versions missing from the cache are probed. Probe failures are
    /// logged and the version is left out; it is probed again next time.
    pub async fn build(&self, prober: &dyn RuntimeProber) -> Result<ProfileMap, StoreError> {
        let loaded = self.load()?;
        let installed = self.installed_versions()?;
        let mut profiles = loaded.clone();

        let candidates = installed
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(SYSTEM_VERSION));

        for version_id in candidates {
            if profiles.contains_key(version_id) {
                continue;
            }
            match prober.probe(version_id).await {
                Ok(Some(profile)) => {
                    debug!(version_id, engine = %profile.engine_name, "Probed runtime");
                    profiles.insert(version_id.to_string(), profile);
                }
                Ok(None) => debug!(version_id, "Runtime not installed, skipping"),
                Err(e) => warn!(version_id, error = %e, "Runtime probe failed"),
            }
        }

        profiles.retain(|version_id, _| {
            version_id == SYSTEM_VERSION || installed.iter().any(|v| v == version_id)
        });

        if profiles == loaded {
            debug!(count = profiles.len(), "Profile cache unchanged");
        } else {
            self.save(&profiles)?;
            info!(count = profiles.len(), path = %self.cache_path.display(), "Saved profile cache");
        }

        Ok(profiles)
    }
}
