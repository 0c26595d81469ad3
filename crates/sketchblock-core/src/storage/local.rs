//! `localStorage` cache implementation for WebAssembly.

use super::{Cache, StorageError, StorageResult};
use web_sys::Storage;

/// Cache backed by the browser's `window.localStorage`.
///
/// Note: This is intentionally not Send/Sync since WASM is single-threaded
/// and `Storage` handles are not thread-safe.
pub struct LocalStorageCache {
    storage: Storage,
}

impl LocalStorageCache {
    /// Bind to the current window's `localStorage`.
    pub fn new() -> StorageResult<Self> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("No window object".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("localStorage error: {:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage not available".to_string()))?;

        Ok(Self { storage })
    }
}

impl Cache for LocalStorageCache {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::Other(format!("getItem error: {:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        // Quota errors surface here.
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Other(format!("setItem error: {:?}", e)))
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::Other(format!("removeItem error: {:?}", e)))
    }
}
