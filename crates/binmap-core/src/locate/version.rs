//! Version pin lookup.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::RehashConfig;
use crate::domain::SYSTEM_VERSION;

/// Version id that applies in `start`.
///
/// The nearest pin file wins, with `config.version_files` checked in order at
/// each level. Without one, the global pin under the runtime root is used,
/// and without that, `"system"`.
pub fn find_version(start: &Path, config: &RehashConfig) -> String {
    for dir in start.ancestors() {
        for name in &config.version_files {
            if name.is_empty() {
                continue;
            }
            let candidate = dir.join(name);
            if let Some(version) = read_pin(&candidate) {
                debug!(pin = %candidate.display(), %version, "Found version pin");
                return version;
            }
        }
    }

    if let Some(version) = read_pin(&config.global_version_path()) {
        debug!(%version, "Using global version pin");
        return version;
    }

    SYSTEM_VERSION.to_string()
}

/// Trimmed content of a pin file, if it is a readable, non-empty file.
pub fn read_pin(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    let content = fs::read_to_string(path).ok()?;
    let version = content.trim();
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_in(root: &Path) -> RehashConfig {
        RehashConfig::new(root.join("rbenv"))
    }

    #[test]
    fn nearest_pin_wins() {
        let temp = tempdir().unwrap();
        let project = temp.path().join("project");
        let nested = project.join("app/models");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join(".ruby-version"), "2.7.8\n").unwrap();
        fs::write(project.join(".ruby-version"), "  3.2.2\n").unwrap();

        assert_eq!(find_version(&nested, &config_in(temp.path())), "3.2.2");
    }

    #[test]
    fn first_variant_wins_at_same_level() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(".ruby-version"), "3.2.2").unwrap();
        fs::write(temp.path().join(".rbenv-version"), "1.9.3").unwrap();

        assert_eq!(find_version(temp.path(), &config_in(temp.path())), "3.2.2");
    }

    #[test]
    fn legacy_variant_is_found() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(".rbenv-version"), "1.9.3-p551\n").unwrap();

        assert_eq!(find_version(temp.path(), &config_in(temp.path())), "1.9.3-p551");
    }

    #[test]
    fn falls_back_to_global_pin_then_system() {
        let temp = tempdir().unwrap();
        let project = temp.path().join("project");
        fs::create_dir_all(&project).unwrap();
        let config = config_in(temp.path());

        assert_eq!(find_version(&project, &config), SYSTEM_VERSION);

        fs::create_dir_all(&config.runtime_root).unwrap();
        fs::write(config.global_version_path(), "3.1.4\n").unwrap();
        assert_eq!(find_version(&project, &config), "3.1.4");
    }

    #[test]
    fn empty_pin_is_ignored() {
        let temp = tempdir().unwrap();
        let project = temp.path().join("project");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join(".ruby-version"), "\n").unwrap();
        fs::write(temp.path().join(".ruby-version"), "3.0.6").unwrap();

        assert_eq!(find_version(&project, &config_in(temp.path())), "3.0.6");
    }
}
