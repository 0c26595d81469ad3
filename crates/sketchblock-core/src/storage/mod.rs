//! Local durable cache backends.
//!
//! The cache is a best-effort key/value mirror of serialized shape lists.
//! It is never authoritative: the document node attribute always wins.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

#[cfg(target_arch = "wasm32")]
mod local;

pub use memory::MemoryCache;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileCache;

#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageCache;

use std::sync::Arc;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for cache backends.
///
/// Implementations can keep entries in memory, in files, or in the
/// browser's `localStorage` (WASM). Calls are synchronous.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait Cache: Send + Sync {
    /// Read an entry; `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write an entry, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove an entry. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Trait for cache backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Cache {
    /// Read an entry; `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write an entry, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove an entry. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<C: Cache + ?Sized> Cache for Arc<C> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// Create the platform-appropriate cache backend.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_default_cache() -> StorageResult<Arc<FileCache>> {
    Ok(Arc::new(FileCache::default_location()?))
}

#[cfg(target_arch = "wasm32")]
pub fn create_default_cache() -> StorageResult<Arc<LocalStorageCache>> {
    Ok(Arc::new(LocalStorageCache::new()?))
}

/// Convenience type alias for the platform-specific cache.
#[cfg(not(target_arch = "wasm32"))]
pub type PlatformCache = FileCache;

#[cfg(target_arch = "wasm32")]
pub type PlatformCache = LocalStorageCache;
