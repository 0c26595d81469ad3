//! In-memory cache implementation.

use super::{Cache, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory cache for testing and ephemeral use.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    /// Create a new empty memory cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let cache = MemoryCache::new();
        cache.set("key", "[1,2]").unwrap();
        assert_eq!(cache.get("key").unwrap().as_deref(), Some("[1,2]"));
    }

    #[test]
    fn test_missing_key() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("nonexistent").unwrap(), None);
    }

    #[test]
    fn test_overwrite_and_remove() {
        let cache = MemoryCache::new();
        cache.set("key", "a").unwrap();
        cache.set("key", "b").unwrap();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("key").unwrap().as_deref(), Some("b"));

        cache.remove("key").unwrap();
        cache.remove("key").unwrap();
        assert!(cache.is_empty());
    }
}
