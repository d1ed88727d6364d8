//! Runtime profiles.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ports::ProbeError;

/// Version id of the runtime found on `PATH` outside the version manager.
pub const SYSTEM_VERSION: &str = "system";

/// Profiles keyed by version id.
pub type ProfileMap = BTreeMap<String, RuntimeProfile>;

/// One installed runtime able to resolve manifests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeProfile {
    /// Version manager id (`"3.2.2"`, `"jruby-9.4.5.0"`, `"system"`).
    pub version_id: String,
    /// Numeric components of the runtime's own version string.
    pub semantic_version: Vec<u32>,
    /// Runtime implementation (`ruby`, `jruby`, ...).
    pub engine_name: String,
    /// ABI version used to scope package directories.
    pub engine_version: String,
    /// The runtime's default package directory.
    pub package_root: PathBuf,
}

impl RuntimeProfile {
    /// Parse the four-line probe output for `version_id`.
    ///
    /// Output with no content means the version is not installed and yields
    /// `Ok(None)`. Anything else must carry all four lines.
    pub fn from_probe_output(version_id: &str, output: &str) -> Result<Option<Self>, ProbeError> {
        if output.trim().is_empty() {
            return Ok(None);
        }

        let lines: Vec<&str> = output.lines().map(str::trim).collect();
        let malformed = |reason: &str| ProbeError::Malformed {
            version_id: version_id.to_string(),
            reason: reason.to_string(),
        };

        let [version, package_root, engine_name, engine_version, ..] = lines.as_slice() else {
            return Err(malformed("expected four lines of output"));
        };

        if package_root.is_empty() {
            return Err(malformed("package root is empty"));
        }
        let semantic_version = parse_semantic_version(version);
        if semantic_version.is_empty() {
            return Err(malformed("version string has no numeric components"));
        }

        Ok(Some(Self {
            version_id: version_id.to_string(),
            semantic_version,
            engine_name: (*engine_name).to_string(),
            engine_version: (*engine_version).to_string(),
            package_root: PathBuf::from(*package_root),
        }))
    }

    /// A profile is usable only while its package root exists.
    pub fn is_usable(&self) -> bool {
        self.package_root.is_dir()
    }

    /// Whether this runtime is at least `min`.
    pub fn meets(&self, min: &[u32]) -> bool {
        self.semantic_version.as_slice() >= min
    }

    /// Relative scope `<engine>/<engine_version>` for package directories.
    pub fn scope(&self) -> PathBuf {
        Path::new(&self.engine_name).join(&self.engine_version)
    }

    /// Per-user package root `~/.gem/<engine>/<engine_version>`.
    pub fn user_package_root(&self, home: &Path) -> PathBuf {
        home.join(".gem").join(self.scope())
    }
}

/// Leading numeric components of a dotted version string.
///
/// Parsing stops at the first component that does not start with a digit, so
/// `"3.3.0-preview1"` gives `[3, 3, 0]` and `"9.4.5.0"` gives `[9, 4, 5, 0]`.
pub fn parse_semantic_version(version: &str) -> Vec<u32> {
    let mut parts = Vec::new();
    for component in version.trim().split('.') {
        let digits: String = component.chars().take_while(char::is_ascii_digit).collect();
        let Ok(value) = digits.parse::<u32>() else {
            break;
        };
        parts.push(value);
        if digits.len() != component.len() {
            break;
        }
    }
    parts
}
