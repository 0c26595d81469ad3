//! File-based cache implementation for native platforms.

use super::{Cache, StorageError, StorageResult};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// File-based cache for native platforms.
///
/// Stores each entry as a `<key>.json` file in a directory.
pub struct FileCache {
    /// Base directory for cache entries.
    base_path: PathBuf,
}

impl FileCache {
    /// Create a new file cache with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path).map_err(|e| {
                StorageError::Io(format!("Failed to create cache directory: {}", e))
            })?;
        }
        Ok(Self { base_path })
    }

    /// Create a file cache in the default location.
    ///
    /// On Unix: `~/.local/share/sketchblock/cache/`
    /// On Windows: `%LOCALAPPDATA%\sketchblock\cache\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_string()))?;

        Self::new(base.join("sketchblock").join("cache"))
    }

    /// Get the file path for a key.
    fn entry_path(&self, key: &str) -> PathBuf {
        let safe_key: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{}.json", safe_key))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

impl Cache for FileCache {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.entry_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Io(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.entry_path(key);
        fs::write(&path, value)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(format!(
                "Failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_cache_set_get() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path().to_path_buf()).unwrap();

        cache.set("drawing-canvas-data", "[]").unwrap();
        assert_eq!(cache.get("drawing-canvas-data").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_cache_missing_key() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path().to_path_buf()).unwrap();
        assert_eq!(cache.get("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_file_cache_remove() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path().to_path_buf()).unwrap();

        cache.set("test", "x").unwrap();
        cache.remove("test").unwrap();
        assert_eq!(cache.get("test").unwrap(), None);
        cache.remove("test").unwrap();
    }

    #[test]
    fn test_file_cache_sanitizes_key() {
        let dir = tempdir().unwrap();
        let cache = FileCache::new(dir.path().to_path_buf()).unwrap();

        cache.set("canvas/node:with*special", "[1]").unwrap();
        assert_eq!(
            cache.get("canvas/node:with*special").unwrap().as_deref(),
            Some("[1]")
        );
        assert!(dir.path().join("canvas_node_with_special.json").exists());
    }

    #[test]
    fn test_file_cache_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let cache = FileCache::new(nested.clone()).unwrap();
        assert_eq!(cache.base_path(), &nested);
        assert!(nested.is_dir());
    }
}
