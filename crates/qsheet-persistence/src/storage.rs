//! [`Storage`] backed by a JSON file.

use std::path::{Path, PathBuf};

use qsheet_core::{Storage, StorageError};

use crate::error::{PersistenceError, Result};
use crate::io::{read_record, write_atomic};

/// Key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "question-sheet";

/// One keyed record stored as `<dir>/<key>.json`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    /// Storage for `key` under `dir`.
    ///
    /// Keys are file stems: they must be non-empty and must not contain path
    /// separators or start with a dot.
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Result<Self> {
        let key = key.trim();
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && !key.contains(['/', '\\'])
            && !key.contains('\0');
        if !valid {
            return Err(PersistenceError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(Self {
            path: dir.as_ref().join(format!("{key}.json")),
        })
    }

    /// Location of the record on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for FileStorage {
    fn load(&self) -> std::result::Result<Option<String>, StorageError> {
        Ok(read_record(&self.path)?)
    }

    fn save(&mut self, contents: &str) -> std::result::Result<(), StorageError> {
        Ok(write_atomic(&self.path, contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_record_path_uses_key() {
        let storage = FileStorage::new("/tmp/qsheet", DEFAULT_STORAGE_KEY).unwrap();
        assert_eq!(
            storage.path(),
            Path::new("/tmp/qsheet/question-sheet.json")
        );
    }

    #[test]
    fn test_rejects_unsafe_keys() {
        for key in ["", "  ", "../escape", "a/b", ".hidden"] {
            assert!(matches!(
                FileStorage::new("/tmp", key),
                Err(PersistenceError::InvalidKey { .. })
            ));
        }
    }

    #[test]
    fn test_load_before_first_save_is_empty() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path(), "sheet").unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path(), "sheet").unwrap();
        storage.save("{\"topics\":[]}").unwrap();
        assert_eq!(
            storage.load().unwrap().as_deref(),
            Some("{\"topics\":[]}")
        );
    }

    #[test]
    fn test_unwritable_location_is_a_write_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        // A regular file where the directory should be.
        let mut storage = FileStorage::new(&blocker, "sheet").unwrap();
        assert!(matches!(
            storage.save("{}"),
            Err(StorageError::Write { .. })
        ));
    }
}
