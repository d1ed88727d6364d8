//! Bundle settings that change where packages are looked up.
//!
//! Settings come from three places, first hit wins per key:
//! 1. the project config (`$BUNDLE_APP_CONFIG/config`, else `<project>/.bundle/config`)
//! 2. the environment
//! 3. the user config (`~/.bundle/config`)
//!
//! Config files are YAML maps of `BUNDLE_*` keys to scalar values.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::env::ChildEnv;
use crate::paths::expand_user_path;

const PATH_KEY: &str = "BUNDLE_PATH";
const DISABLE_SHARED_KEY: &str = "BUNDLE_DISABLE_SHARED_GEMS";
const APP_CONFIG_KEY: &str = "BUNDLE_APP_CONFIG";

type SettingsMap = BTreeMap<String, String>;

/// The subset of bundle settings that shape the resolver environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleSettings {
    /// Install path, absolute.
    pub path: Option<PathBuf>,
    /// Search only the install path.
    pub disable_shared_gems: bool,
}

impl BundleSettings {
    /// Read the settings that apply to the project in `project_dir`.
    pub fn load(project_dir: &Path, env: &ChildEnv, home: Option<&Path>) -> Self {
        let app_config = env
            .get(APP_CONFIG_KEY)
            .filter(|value| !value.is_empty())
            .and_then(|value| expand_user_path(&value.to_string_lossy(), project_dir, home))
            .unwrap_or_else(|| project_dir.join(".bundle"));

        let local = read_config(&app_config.join("config"));
        let global = home
            .map(|home| read_config(&home.join(".bundle").join("config")))
            .unwrap_or_default();

        let lookup = |key: &str| -> Option<String> {
            local
                .get(key)
                .cloned()
                .or_else(|| {
                    env.get(key)
                        .map(|value| value.to_string_lossy().into_owned())
                })
                .or_else(|| global.get(key).cloned())
                .filter(|value| !value.trim().is_empty())
        };

        Self {
            path: lookup(PATH_KEY).and_then(|raw| expand_user_path(&raw, project_dir, home)),
            disable_shared_gems: lookup(DISABLE_SHARED_KEY).is_some_and(|raw| is_truthy(&raw)),
        }
    }
}

fn read_config(path: &Path) -> SettingsMap {
    let Ok(content) = fs::read_to_string(path) else {
        return SettingsMap::new();
    };
    parse_config(&content).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "Ignoring unreadable bundle config");
        SettingsMap::new()
    })
}

fn parse_config(content: &str) -> Result<SettingsMap, serde_yaml::Error> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)?;
    let serde_yaml::Value::Mapping(mapping) = value else {
        return Ok(SettingsMap::new());
    };

    let settings = mapping
        .into_iter()
        .filter_map(|(key, value)| {
            let key = key.as_str()?.to_string();
            let value = match value {
                serde_yaml::Value::String(s) => s,
                serde_yaml::Value::Bool(b) => b.to_string(),
                serde_yaml::Value::Number(n) => n.to_string(),
                _ => return None,
            };
            Some((key, value))
        })
        .collect();
    Ok(settings)
}

fn is_truthy(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "" | "false" | "0" | "no" | "nil"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_config(dir: &Path, body: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join("config"), body).unwrap();
    }

    #[test]
    fn no_settings_anywhere() {
        let temp = tempdir().unwrap();
        let settings = BundleSettings::load(temp.path(), &ChildEnv::default(), None);
        assert_eq!(settings, BundleSettings::default());
    }

    #[test]
    fn project_config_resolves_relative_path() {
        let temp = tempdir().unwrap();
        let project = temp.path().join("app");
        write_config(
            &project.join(".bundle"),
            "---\nBUNDLE_PATH: \"vendor/bundle\"\nBUNDLE_DISABLE_SHARED_GEMS: \"true\"\n",
        );

        let settings = BundleSettings::load(&project, &ChildEnv::default(), None);
        assert_eq!(settings.path, Some(project.join("vendor/bundle")));
        assert!(settings.disable_shared_gems);
    }

    #[test]
    fn project_config_beats_environment_beats_user_config() {
        let temp = tempdir().unwrap();
        let home = temp.path().join("home");
        let project = temp.path().join("app");
        fs::create_dir_all(&project).unwrap();
        write_config(
            &home.join(".bundle"),
            "BUNDLE_PATH: /user/gems\nBUNDLE_DISABLE_SHARED_GEMS: true\n",
        );
        let env = ChildEnv::from_vars([("BUNDLE_PATH", "/env/gems")]);

        let settings = BundleSettings::load(&project, &env, Some(&home));
        assert_eq!(settings.path, Some(PathBuf::from("/env/gems")));
        assert!(settings.disable_shared_gems, "user config still supplies unset keys");

        write_config(&project.join(".bundle"), "BUNDLE_PATH: /project/gems\n");
        let settings = BundleSettings::load(&project, &env, Some(&home));
        assert_eq!(settings.path, Some(PathBuf::from("/project/gems")));
    }

    #[test]
    fn app_config_variable_moves_project_config() {
        let temp = tempdir().unwrap();
        let project = temp.path().join("app");
        fs::create_dir_all(&project).unwrap();
        write_config(&temp.path().join("shared-config"), "BUNDLE_PATH: ~/bundles\n");
        let env = ChildEnv::from_vars([(
            "BUNDLE_APP_CONFIG",
            temp.path().join("shared-config").into_os_string(),
        )]);

        let settings = BundleSettings::load(&project, &env, Some(Path::new("/home/dev")));
        assert_eq!(settings.path, Some(PathBuf::from("/home/dev/bundles")));
    }

    #[test]
    fn false_disable_flag_keeps_shared_gems() {
        let temp = tempdir().unwrap();
        write_config(
            &temp.path().join(".bundle"),
            "BUNDLE_DISABLE_SHARED_GEMS: \"false\"\n",
        );
        let settings = BundleSettings::load(temp.path(), &ChildEnv::default(), None);
        assert!(!settings.disable_shared_gems);
    }

    #[test]
    fn malformed_config_is_ignored() {
        let temp = tempdir().unwrap();
        write_config(&temp.path().join(".bundle"), "BUNDLE_PATH: [unclosed\n");
        let settings = BundleSettings::load(temp.path(), &ChildEnv::default(), None);
        assert_eq!(settings, BundleSettings::default());
    }
}
