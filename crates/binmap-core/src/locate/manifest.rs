//! Manifest lookup.

use std::path::{Path, PathBuf};

/// Nearest `manifest_file` in `start` or one of its ancestors.
pub fn find_manifest(start: &Path, manifest_file: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(manifest_file))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn finds_manifest_in_ancestor() {
        let temp = tempdir().unwrap();
        let nested = temp.path().join("lib/tasks");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join("Gemfile"), "source 'https://rubygems.org'\n").unwrap();

        assert_eq!(
            find_manifest(&nested, "Gemfile"),
            Some(temp.path().join("Gemfile"))
        );
    }

    #[test]
    fn directory_named_like_manifest_is_skipped() {
        let temp = tempdir().unwrap();
        let project = temp.path().join("project");
        fs::create_dir_all(project.join("Gemfile")).unwrap();
        fs::write(temp.path().join("Gemfile"), "").unwrap();

        assert_eq!(
            find_manifest(&project, "Gemfile"),
            Some(temp.path().join("Gemfile"))
        );
    }

    #[test]
    fn absent_manifest_is_none() {
        let temp = tempdir().unwrap();
        assert_eq!(find_manifest(temp.path(), "Gemfile.binmap-test-absent"), None);
    }
}
