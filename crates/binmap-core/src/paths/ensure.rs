//! Output directory verification.
//!
//! The output directory is never created implicitly: a missing or read-only
//! directory is a configuration error reported before anything is written.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use super::error::PathError;

/// Verify that `path` is an existing, writable directory.
pub fn verify_output_dir(path: &Path) -> Result<(), PathError> {
    if !path.exists() {
        return Err(PathError::DirectoryNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(PathError::NotADirectory(path.to_path_buf()));
    }
    verify_writable(path)
}

/// Verify a directory is writable by attempting to create a test file.
pub fn verify_writable(path: &Path) -> Result<(), PathError> {
    let test_file = path.join(".binmap_write_test");
    let result = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&test_file);

    match result {
        Ok(mut file) => {
            file.write_all(b"test")
                .map_err(|e| PathError::NotWritable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;
            drop(file);
            let _ = fs::remove_file(&test_file);
            Ok(())
        }
        Err(err) => Err(PathError::NotWritable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_directory_is_rejected() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("nope");
        assert!(matches!(
            verify_output_dir(&missing),
            Err(PathError::DirectoryNotFound(_))
        ));
        assert!(!missing.exists(), "verification must not create the directory");
    }

    #[test]
    fn file_is_not_a_directory() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("manifest.txt");
        fs::write(&file, "").unwrap();
        assert!(matches!(
            verify_output_dir(&file),
            Err(PathError::NotADirectory(_))
        ));
    }

    #[test]
    fn writable_directory_passes_and_leaves_no_probe_file() {
        let temp = tempdir().unwrap();
        verify_output_dir(temp.path()).unwrap();
        assert!(!temp.path().join(".binmap_write_test").exists());
    }
}
