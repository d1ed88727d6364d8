//! Resolver target variables for one manifest and profile.

use std::env::{self, JoinPathsError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::{RehashConfig, ResolverVars};
use crate::domain::RuntimeProfile;
use crate::env::ChildEnv;

use super::BundleSettings;

/// The three values the external resolver reads its targets from.
///
/// ```text
/// no bundle path          home = package_root     search = shared roots
/// bundle path            home = <path>/<scope>    search = package_root + shared roots
/// bundle path, unshared  home = <path>/<scope>    search = (empty)
/// ```
///
/// Shared roots never include the package home itself and are deduplicated
/// with empties removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverEnv {
    pub manifest: PathBuf,
    pub package_home: PathBuf,
    pub search_path: Vec<PathBuf>,
}

impl ResolverEnv {
    pub fn for_profile(
        manifest: &Path,
        profile: &RuntimeProfile,
        settings: &BundleSettings,
        shared_roots: &[PathBuf],
    ) -> Self {
        let (package_home, search_path) = match &settings.path {
            Some(path) if settings.disable_shared_gems => (path.join(profile.scope()), Vec::new()),
            Some(path) => {
                let home = path.join(profile.scope());
                let search = std::iter::once(&profile.package_root).chain(shared_roots);
                let search = dedup_roots(search, &home);
                (home, search)
            }
            None => {
                let home = profile.package_root.clone();
                let search = dedup_roots(shared_roots.iter(), &home);
                (home, search)
            }
        };

        Self {
            manifest: manifest.to_path_buf(),
            package_home,
            search_path,
        }
    }

    /// Clear the resolver variables in `child` and set them from `self`.
    pub fn apply(&self, child: &mut ChildEnv, vars: &ResolverVars) -> Result<(), JoinPathsError> {
        child.remove(&vars.manifest);
        child.remove(&vars.home);
        child.remove(&vars.search_path);

        let search_path = if self.search_path.is_empty() {
            OsString::new()
        } else {
            env::join_paths(&self.search_path)?
        };

        child.set(&vars.manifest, self.manifest.as_os_str());
        child.set(&vars.home, self.package_home.as_os_str());
        child.set(&vars.search_path, search_path);
        Ok(())
    }
}

/// Shared package roots for `profile`: the user root, then configured roots.
pub fn shared_search_roots(profile: &RuntimeProfile, config: &RehashConfig) -> Vec<PathBuf> {
    config
        .home()
        .map(|home| profile.user_package_root(home))
        .into_iter()
        .chain(config.search_roots.iter().cloned())
        .collect()
}

fn dedup_roots<'a>(roots: impl Iterator<Item = &'a PathBuf>, exclude: &Path) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();
    for root in roots {
        if root.as_os_str().is_empty() || root == exclude || out.contains(root) {
            continue;
        }
        out.push(root.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> RuntimeProfile {
        RuntimeProfile {
            version_id: "3.2.2".to_string(),
            semantic_version: vec![3, 2, 2],
            engine_name: "ruby".to_string(),
            engine_version: "3.2.0".to_string(),
            package_root: PathBuf::from("/rbenv/versions/3.2.2/lib/ruby/gems/3.2.0"),
        }
    }

    fn shared() -> Vec<PathBuf> {
        vec![
            PathBuf::from("/home/dev/.gem/ruby/3.2.0"),
            PathBuf::new(),
            PathBuf::from("/opt/gems"),
            PathBuf::from("/opt/gems"),
        ]
    }

    #[test]
    fn default_home_is_package_root() {
        let env = ResolverEnv::for_profile(
            Path::new("/srv/app/Gemfile"),
            &profile(),
            &BundleSettings::default(),
            &shared(),
        );
        assert_eq!(env.package_home, profile().package_root);
        assert_eq!(
            env.search_path,
            vec![PathBuf::from("/home/dev/.gem/ruby/3.2.0"), PathBuf::from("/opt/gems")]
        );
    }

    #[test]
    fn bundle_path_scopes_home_and_searches_package_root() {
        let settings = BundleSettings {
            path: Some(PathBuf::from("/srv/app/vendor/bundle")),
            disable_shared_gems: false,
        };
        let env = ResolverEnv::for_profile(
            Path::new("/srv/app/Gemfile"),
            &profile(),
            &settings,
            &shared(),
        );
        assert_eq!(
            env.package_home,
            PathBuf::from("/srv/app/vendor/bundle/ruby/3.2.0")
        );
        assert_eq!(env.search_path[0], profile().package_root);
        assert_eq!(env.search_path.len(), 3);
    }

    #[test]
    fn disabled_shared_gems_empties_search_path() {
        let settings = BundleSettings {
            path: Some(PathBuf::from("/srv/app/vendor/bundle")),
            disable_shared_gems: true,
        };
        let env = ResolverEnv::for_profile(
            Path::new("/srv/app/Gemfile"),
            &profile(),
            &settings,
            &shared(),
        );
        assert!(env.search_path.is_empty());
    }

    #[test]
    fn apply_overrides_ambient_resolver_vars() {
        let vars = ResolverVars::default();
        let mut child = ChildEnv::from_vars([
            ("GEM_HOME", "/stale/home"),
            ("GEM_PATH", "/stale/path"),
            ("BUNDLE_GEMFILE", "/stale/Gemfile"),
            ("HOME", "/home/dev"),
        ]);
        let settings = BundleSettings {
            path: Some(PathBuf::from("/srv/app/vendor/bundle")),
            disable_shared_gems: true,
        };
        let env = ResolverEnv::for_profile(Path::new("/srv/app/Gemfile"), &profile(), &settings, &[]);

        env.apply(&mut child, &vars).unwrap();

        assert_eq!(
            child.get("BUNDLE_GEMFILE"),
            Some(Path::new("/srv/app/Gemfile").as_os_str())
        );
        assert_eq!(
            child.get("GEM_HOME"),
            Some(Path::new("/srv/app/vendor/bundle/ruby/3.2.0").as_os_str())
        );
        assert_eq!(child.get("GEM_PATH"), Some(OsString::new().as_os_str()));
        assert_eq!(child.get("HOME"), Some(Path::new("/home/dev").as_os_str()));
    }

    #[test]
    fn shared_roots_start_with_user_root() {
        let mut config = RehashConfig::new("/rbenv");
        config.home_dir = Some(PathBuf::from("/home/dev"));
        config.search_roots = vec![PathBuf::from("/opt/gems")];
        assert_eq!(
            shared_search_roots(&profile(), &config),
            vec![PathBuf::from("/home/dev/.gem/ruby/3.2.0"), PathBuf::from("/opt/gems")]
        );
    }
}
