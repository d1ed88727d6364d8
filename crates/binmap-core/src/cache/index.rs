//! `manifest.txt` reading and writing.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::CacheError;
use crate::domain::IndexEntry;
use crate::paths::OutputLayout;

/// Read the index. A missing index is empty.
pub fn read_index(layout: &OutputLayout) -> Result<Vec<IndexEntry>, CacheError> {
    let path = layout.index_path();
    match fs::read_to_string(&path) {
        Ok(content) => Ok(parse_index(&content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(CacheError::io("read", &path)(e)),
    }
}

/// Parse index content into entries. A trailing unpaired line is ignored.
pub fn parse_index(content: &str) -> Vec<IndexEntry> {
    let lines: Vec<&str> = content.lines().filter(|line| !line.is_empty()).collect();
    lines
        .chunks_exact(2)
        .map(|pair| IndexEntry {
            manifest_path: PathBuf::from(pair[0]),
            listing_file: pair[1].to_string(),
        })
        .collect()
}

/// Writes the index one pair at a time.
///
/// Pairs go to `<index>.tmp`; [`finish`](Self::finish) renames it over the
/// index. Until then the previous index stays in place, so an aborted pass
/// leaves it untouched.
#[derive(Debug)]
pub struct IndexWriter {
    path: PathBuf,
    tmp_path: PathBuf,
    file: File,
}

impl IndexWriter {
    pub fn create(path: &Path) -> Result<Self, CacheError> {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        let tmp_path = path.with_file_name(name);
        let file = File::create(&tmp_path).map_err(CacheError::io("create", &tmp_path))?;
        Ok(Self {
            path: path.to_path_buf(),
            tmp_path,
            file,
        })
    }

    /// Append one pair. The manifest path must be valid UTF-8.
    pub fn append(&mut self, entry: &IndexEntry) -> Result<(), CacheError> {
        let manifest = entry.manifest_path.to_str().ok_or_else(|| {
            CacheError::io("index", &entry.manifest_path)(io::Error::new(
                io::ErrorKind::InvalidData,
                "path is not valid UTF-8",
            ))
        })?;
        let pair = format!("{manifest}\n{}\n", entry.listing_file);
        self.file
            .write_all(pair.as_bytes())
            .map_err(CacheError::io("write", &self.tmp_path))
    }

    /// Replace the index with the pairs written so far.
    pub fn finish(self) -> Result<(), CacheError> {
        let Self {
            path,
            tmp_path,
            mut file,
        } = self;
        file.flush()
            .and_then(|()| file.sync_all())
            .map_err(CacheError::io("write", &tmp_path))?;
        drop(file);
        fs::rename(&tmp_path, &path).map_err(CacheError::io("replace", &path))
    }

    /// Drop the pairs written so far and keep the previous index.
    pub fn discard(self) -> Result<(), CacheError> {
        let Self { tmp_path, file, .. } = self;
        drop(file);
        match fs::remove_file(&tmp_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CacheError::io("remove", &tmp_path)(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_index_reads_empty() {
        let temp = tempdir().unwrap();
        let layout = OutputLayout::new(temp.path());
        assert!(read_index(&layout).unwrap().is_empty());
    }

    #[test]
    fn parses_pairs_and_drops_dangling_line() {
        let entries = parse_index("/a/Gemfile\naa.txt\n/b/Gemfile\nbb.txt\n/c/Gemfile\n");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].manifest_path, PathBuf::from("/b/Gemfile"));
        assert_eq!(entries[1].listing_file, "bb.txt");
    }

    fn app_entry() -> IndexEntry {
        IndexEntry {
            manifest_path: PathBuf::from("/srv/app/Gemfile"),
            listing_file: "ab.txt".to_string(),
        }
    }

    #[test]
    fn writer_replaces_index_on_finish() {
        let temp = tempdir().unwrap();
        let layout = OutputLayout::new(temp.path());
        fs::write(layout.index_path(), "/old/Gemfile\nold.txt\n").unwrap();

        let mut writer = IndexWriter::create(&layout.index_path()).unwrap();
        writer.append(&app_entry()).unwrap();
        assert_eq!(
            fs::read_to_string(layout.index_path()).unwrap(),
            "/old/Gemfile\nold.txt\n"
        );
        writer.finish().unwrap();

        assert_eq!(
            fs::read_to_string(layout.index_path()).unwrap(),
            "/srv/app/Gemfile\nab.txt\n"
        );
        assert!(!temp.path().join("manifest.txt.tmp").exists());
    }

    #[test]
    fn discarded_writer_keeps_previous_index() {
        let temp = tempdir().unwrap();
        let layout = OutputLayout::new(temp.path());
        fs::write(layout.index_path(), "/old/Gemfile\nold.txt\n").unwrap();

        let mut writer = IndexWriter::create(&layout.index_path()).unwrap();
        writer.append(&app_entry()).unwrap();
        writer.discard().unwrap();

        assert_eq!(
            fs::read_to_string(layout.index_path()).unwrap(),
            "/old/Gemfile\nold.txt\n"
        );
        assert!(!temp.path().join("manifest.txt.tmp").exists());
    }
}
