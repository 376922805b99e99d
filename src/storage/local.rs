//! Local filesystem backend
//!
//! Paths are relative to a base directory. Every call completes
//! immediately.

use super::StorageError;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_dir: PathBuf,
}

impl LocalStorage {
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.base_dir.join(path)
    }

    pub fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full_path = self.resolve(path);
        std::fs::read(&full_path).map_err(|e| StorageError::io(&full_path, e))
    }

    /// Create or overwrite, making parent directories as needed
    pub fn write(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let full_path = self.resolve(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
        }
        std::fs::write(&full_path, data).map_err(|e| StorageError::io(&full_path, e))
    }

    /// Remove a file. A missing file is not an error.
    pub fn delete(&self, path: &str) -> Result<(), StorageError> {
        let full_path = self.resolve(path);
        match std::fs::remove_file(&full_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(&full_path, e)),
        }
    }

    pub fn exists(&self, path: &str) -> bool {
        self.resolve(path).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_dir() -> (TempDir, LocalStorage) {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::with_base_dir(dir.path());
        (dir, storage)
    }

    #[test]
    fn test_write_and_read() {
        let (_dir, storage) = setup_test_dir();
        storage.write("test.ron", b"(camera: None)").unwrap();
        assert_eq!(storage.read("test.ron").unwrap(), b"(camera: None)");
    }

    #[test]
    fn test_read_not_found() {
        let (_dir, storage) = setup_test_dir();
        assert!(matches!(
            storage.read("nonexistent.ron"),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (dir, storage) = setup_test_dir();
        std::fs::write(dir.path().join("delete_me.ron"), "x").unwrap();

        storage.delete("delete_me.ron").unwrap();
        assert!(!storage.exists("delete_me.ron"));
        storage.delete("delete_me.ron").unwrap();
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let (_dir, storage) = setup_test_dir();
        storage.write("deep/nested/file.ron", b"data").unwrap();
        assert_eq!(storage.read("deep/nested/file.ron").unwrap(), b"data");
    }
}
