//! One rehash pass over a manifest set.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::{debug, info, warn};

use super::index::IndexWriter;
use super::listing::write_listing;
use super::sweep::{remove_listing, sweep_listings};
use super::{CacheError, Candidate, ManifestSet, RehashSummary};
use crate::config::RehashConfig;
use crate::domain::{IndexEntry, ManifestRecord, ProfileMap, RuntimeProfile, listing_file_name};
use crate::locate::find_version;
use crate::paths::{OutputLayout, verify_output_dir};
use crate::ports::PackageResolver;

/// Owns the index and listing files in one output directory.
#[derive(Debug, Clone)]
pub struct ManifestCache {
    layout: OutputLayout,
    config: RehashConfig,
}

impl ManifestCache {
    pub fn new(layout: OutputLayout, config: RehashConfig) -> Self {
        Self { layout, config }
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    /// Rewrite the index from `manifests`.
    ///
    /// # Per manifest
    /// 1. Gone from disk: its old listing is deleted and it leaves the index
    /// 2. Retained with its listing present: index pair copied as is
    /// 3. Otherwise its old listing is deleted, its profile looked up from the
    ///    version pin, and it is resolved; failures leave the index
    ///
    /// Unreferenced listings are swept afterwards. A `ResolverUnavailable`
    /// outcome stops the pass with the previous index left in place and no
    /// sweep.
    pub async fn rehash(
        &self,
        profiles: &ProfileMap,
        manifests: ManifestSet,
        resolver: &dyn PackageResolver,
    ) -> Result<RehashSummary, CacheError> {
        verify_output_dir(self.layout.root()).map_err(CacheError::OutputDir)?;

        let mut writer = IndexWriter::create(&self.layout.index_path())?;
        let mut keep = BTreeSet::new();
        let mut summary = RehashSummary::default();

        for (manifest, candidate) in manifests {
            if !manifest.is_file() {
                self.forget(&manifest, &candidate)?;
                debug!(manifest = %manifest.display(), "Manifest removed, dropping");
                summary.removed += 1;
                continue;
            }

            match &candidate {
                Candidate::Retained { listing_file }
                    if self.layout.listing_path(listing_file).is_file() =>
                {
                    writer.append(&IndexEntry {
                        manifest_path: manifest.clone(),
                        listing_file: listing_file.clone(),
                    })?;
                    keep.insert(listing_file.clone());
                    summary.retained += 1;
                    continue;
                }
                Candidate::Retained { .. } => {
                    debug!(manifest = %manifest.display(), "Listing missing, re-resolving");
                }
                Candidate::Requested { .. } => {}
            }

            self.forget(&manifest, &candidate)?;

            let Some(profile) = self.profile_for(&manifest, profiles) else {
                summary.skipped += 1;
                continue;
            };

            if !is_indexable(&manifest) {
                warn!(manifest = %manifest.display(), "Manifest path cannot be indexed");
                summary.failed += 1;
                continue;
            }

            match resolver.resolve(&manifest, profile).await {
                Ok(packages) => {
                    let record =
                        ManifestRecord::from_packages(&manifest, &packages, &self.config.launcher);
                    write_listing(&self.layout, &record)?;
                    writer.append(&record.index_entry())?;
                    debug!(
                        manifest = %manifest.display(),
                        executables = record.entries.len(),
                        "Resolved manifest"
                    );
                    keep.insert(record.listing_file);
                    summary.resolved += 1;
                }
                Err(e) if e.is_fatal() => {
                    writer.discard()?;
                    return Err(CacheError::ResolverUnavailable(e.to_string()));
                }
                Err(e) => {
                    warn!(manifest = %manifest.display(), error = %e, "Dropping manifest");
                    summary.failed += 1;
                }
            }
        }

        writer.finish()?;
        summary.swept = sweep_listings(self.layout.root(), &keep)?;
        info!(%summary, "Rehash complete");
        Ok(summary)
    }

    /// Delete every listing the manifest may own: the one recorded for it and
    /// the one its path hashes to.
    fn forget(&self, manifest: &Path, candidate: &Candidate) -> Result<(), CacheError> {
        let recorded = match candidate {
            Candidate::Requested { previous_listing } => previous_listing.as_deref(),
            Candidate::Retained { listing_file } => Some(listing_file.as_str()),
        };
        if let Some(listing_file) = recorded {
            remove_listing(&self.layout.listing_path(listing_file))?;
        }
        remove_listing(&self.layout.listing_path(&listing_file_name(manifest)))
    }

    fn profile_for<'a>(&self, manifest: &Path, profiles: &'a ProfileMap) -> Option<&'a RuntimeProfile> {
        let dir = manifest.parent().unwrap_or(manifest);
        let version_id = find_version(dir, &self.config);
        match profiles.get(&version_id) {
            Some(profile) if profile.is_usable() => Some(profile),
            Some(profile) => {
                warn!(
                    manifest = %manifest.display(),
                    version_id = %version_id,
                    package_root = %profile.package_root.display(),
                    "Package root missing, skipping"
                );
                None
            }
            None => {
                warn!(
                    manifest = %manifest.display(),
                    version_id = %version_id,
                    "No profile for version, skipping"
                );
                None
            }
        }
    }
}

/// Index lines hold the path verbatim, so it must be UTF-8 without newlines.
fn is_indexable(manifest: &Path) -> bool {
    manifest.to_str().is_some_and(|s| !s.contains('\n'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ResolutionOutcome, ResolvedPackage};
    use crate::ports::ResolveError;
    use async_trait::async_trait;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::{TempDir, tempdir};

    struct ScriptedResolver {
        outcomes: Vec<(PathBuf, ResolutionOutcome)>,
        calls: Mutex<Vec<PathBuf>>,
    }

    impl ScriptedResolver {
        fn new(outcomes: Vec<(PathBuf, ResolutionOutcome)>) -> Self {
            Self {
                outcomes,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<PathBuf> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PackageResolver for ScriptedResolver {
        async fn resolve(&self, manifest: &Path, _profile: &RuntimeProfile) -> ResolutionOutcome {
            self.calls.lock().unwrap().push(manifest.to_path_buf());
            self.outcomes
                .iter()
                .find(|(path, _)| path == manifest)
                .map_or_else(|| Ok(Vec::new()), |(_, outcome)| outcome.clone())
        }
    }

    struct Fixture {
        temp: TempDir,
        out: PathBuf,
        profiles: ProfileMap,
        cache: ManifestCache,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = tempdir().unwrap();
            let out = temp.path().join("out");
            let gems = temp.path().join("gems");
            fs::create_dir_all(&out).unwrap();
            fs::create_dir_all(&gems).unwrap();

            let config = RehashConfig::new(temp.path().join("rbenv"));
            let mut profiles = ProfileMap::new();
            profiles.insert(
                "system".to_string(),
                RuntimeProfile {
                    version_id: "system".to_string(),
                    semantic_version: vec![3, 2, 2],
                    engine_name: "ruby".to_string(),
                    engine_version: "3.2.0".to_string(),
                    package_root: gems,
                },
            );
            let cache = ManifestCache::new(OutputLayout::new(&out), config);
            Self {
                temp,
                out,
                profiles,
                cache,
            }
        }

        fn manifest(&self, name: &str) -> PathBuf {
            let dir = self.temp.path().join(name);
            fs::create_dir_all(&dir).unwrap();
            let manifest = dir.join("Gemfile");
            fs::write(&manifest, "source 'https://rubygems.org'\n").unwrap();
            manifest
        }

        fn index(&self) -> String {
            fs::read_to_string(self.out.join("manifest.txt")).unwrap()
        }
    }

    fn requested(paths: &[&PathBuf]) -> ManifestSet {
        let mut set = ManifestSet::new();
        for path in paths {
            set.request((*path).clone());
        }
        set
    }

    #[tokio::test]
    async fn failed_manifest_is_left_out_of_index() {
        let fx = Fixture::new();
        let a = fx.manifest("a");
        let b = fx.manifest("b");
        let resolver = ScriptedResolver::new(vec![
            (a.clone(), Ok(vec![ResolvedPackage::new("/x/bin", ["foo"])])),
            (b.clone(), Err(ResolveError::ResolutionFailed("GemNotFound".into()))),
        ]);

        let summary = fx
            .cache
            .rehash(&fx.profiles, requested(&[&a, &b]), &resolver)
            .await
            .unwrap();

        let listing = listing_file_name(&a);
        assert_eq!(fx.index(), format!("{}\n{listing}\n", a.display()));
        assert_eq!(fs::read_to_string(fx.out.join(&listing)).unwrap(), "foo\n/x/bin\n");
        assert_eq!(summary.resolved, 1);
        assert_eq!(summary.failed, 1);
    }

    #[tokio::test]
    async fn unavailable_resolver_aborts() {
        let fx = Fixture::new();
        let a = fx.manifest("a");
        let resolver = ScriptedResolver::new(vec![(
            a.clone(),
            Err(ResolveError::ResolverUnavailable("no capable runtime".into())),
        )]);

        let err = fx
            .cache
            .rehash(&fx.profiles, requested(&[&a]), &resolver)
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::ResolverUnavailable(_)));
        assert!(!fx.out.join("manifest.txt").exists());
        assert!(!fx.out.join("manifest.txt.tmp").exists());
    }

    #[tokio::test]
    async fn missing_profile_skips_without_resolving() {
        let fx = Fixture::new();
        let a = fx.manifest("a");
        fs::write(a.parent().unwrap().join(".ruby-version"), "9.9.9\n").unwrap();
        let resolver = ScriptedResolver::new(Vec::new());

        let summary = fx
            .cache
            .rehash(&fx.profiles, requested(&[&a]), &resolver)
            .await
            .unwrap();

        assert!(resolver.calls().is_empty());
        assert_eq!(summary.skipped, 1);
        assert_eq!(fx.index(), "");
    }

    #[tokio::test]
    async fn missing_output_dir_is_fatal_before_resolving() {
        let fx = Fixture::new();
        let a = fx.manifest("a");
        fs::remove_dir_all(&fx.out).unwrap();
        let resolver = ScriptedResolver::new(Vec::new());

        let err = fx
            .cache
            .rehash(&fx.profiles, requested(&[&a]), &resolver)
            .await
            .unwrap_err();
        assert!(matches!(err, CacheError::OutputDir(_)));
        assert!(resolver.calls().is_empty());
    }

    #[tokio::test]
    async fn retained_entry_with_missing_listing_is_resolved_again() {
        let fx = Fixture::new();
        let a = fx.manifest("a");
        let mut set = ManifestSet::new();
        set.seed_from_index(vec![IndexEntry::for_manifest(&a)]);
        let resolver = ScriptedResolver::new(vec![(
            a.clone(),
            Ok(vec![ResolvedPackage::new("/x/bin", ["foo"])]),
        )]);

        let summary = fx.cache.rehash(&fx.profiles, set, &resolver).await.unwrap();

        assert_eq!(resolver.calls(), vec![a.clone()]);
        assert_eq!(summary.resolved, 1);
        assert!(fx.out.join(listing_file_name(&a)).is_file());
    }
}
