#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! FNV-1a content hashing and the incremental-regeneration hash cache
//! (component H).
//!
//! FNV-1a is chosen for speed, not cryptographic integrity (§9): it is used
//! solely to decide whether the CMake Emitter needs to re-render, never to
//! verify a dependency's integrity (that uses the registry-provided
//! checksum via the lock file instead).

mod cache;
mod fnv;

pub use fnv::{hash_bytes, hash_dir, hash_file, Fnv1a};

use cforge_errors::{Error, HashError};
use cforge_types::HashCache;
use std::path::Path;

/// Load the hash cache from `path`, returning an empty cache (not an error)
/// if the file is absent or corrupt (§7: "Hash cache corruption is treated
/// as absent").
pub async fn load_or_default(path: &Path) -> HashCache {
    match cache::load_cache(path).await {
        Ok(cache) => cache,
        Err(_) => HashCache::new(),
    }
}

/// Persist the hash cache to `path`.
///
/// # Errors
/// Returns [`HashError::CacheWriteFailed`] if the file cannot be written.
pub async fn save(path: &Path, cache: &HashCache) -> Result<(), Error> {
    cache::store_cache(path, cache).await
}

/// Hash a single file's bytes.
///
/// # Errors
/// Returns [`HashError::ReadFailed`] if the file cannot be read.
pub async fn hash_path(path: &Path) -> Result<String, Error> {
    fnv::hash_file(path).await
}

/// Hash a directory tree: entries are sorted lexicographically by path
/// relative to `root`, then folded into the rolling hash as path bytes
/// followed by file bytes for regular files (§4.8).
///
/// # Errors
/// Returns [`HashError::ReadFailed`] if any entry cannot be read.
pub async fn hash_directory(root: &Path) -> Result<String, Error> {
    fnv::hash_dir(root).await
}
