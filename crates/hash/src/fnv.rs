//! FNV-1a (64-bit) hashing over byte sequences, files, and directory trees.

use cforge_errors::{Error, HashError};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01B3;

/// A rolling FNV-1a (64-bit) hasher.
#[derive(Debug, Clone, Copy)]
pub struct Fnv1a(u64);

impl Default for Fnv1a {
    fn default() -> Self {
        Self::new()
    }
}

impl Fnv1a {
    #[must_use]
    pub fn new() -> Self {
        Self(FNV_OFFSET_BASIS)
    }

    pub fn update(&mut self, bytes: &[u8]) -> &mut Self {
        for byte in bytes {
            self.0 ^= u64::from(*byte);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
        self
    }

    #[must_use]
    pub fn finish(&self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn finish_hex(&self) -> String {
        format!("{:016x}", self.0)
    }
}

/// Hash a byte slice, rendered as a 16-hex-digit lowercase string.
#[must_use]
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Fnv1a::new();
    hasher.update(data);
    hasher.finish_hex()
}

/// Hash a single file's full contents.
///
/// # Errors
/// Returns [`HashError::ReadFailed`] if the file cannot be read.
pub async fn hash_file(path: &Path) -> Result<String, Error> {
    let mut file = tokio::fs::File::open(path)
        .await
        .map_err(|e| HashError::ReadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    let mut buf = Vec::new();
    file.read_to_end(&mut buf)
        .await
        .map_err(|e| HashError::ReadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    Ok(hash_bytes(&buf))
}

/// Hash a directory tree. Entries are visited in lexicographic order of
/// their path relative to `root`; the rolling hash folds in each entry's
/// relative-path bytes, then the file's bytes for regular files (§4.8).
///
/// # Errors
/// Returns [`HashError::ReadFailed`] if any entry under `root` cannot be
/// read.
pub async fn hash_dir(root: &Path) -> Result<String, Error> {
    let mut entries = collect_entries(root, root).await?;
    entries.sort();

    let mut hasher = Fnv1a::new();
    for rel in entries {
        hasher.update(rel.to_string_lossy().as_bytes());
        let abs = root.join(&rel);
        if abs.is_file() {
            let mut file =
                tokio::fs::File::open(&abs)
                    .await
                    .map_err(|e| HashError::ReadFailed {
                        path: abs.display().to_string(),
                        message: e.to_string(),
                    })?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .await
                .map_err(|e| HashError::ReadFailed {
                    path: abs.display().to_string(),
                    message: e.to_string(),
                })?;
            hasher.update(&buf);
        }
    }
    Ok(hasher.finish_hex())
}

fn collect_entries<'a>(
    root: &'a Path,
    dir: &'a Path,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Vec<PathBuf>, Error>> + Send + 'a>>
{
    Box::pin(async move {
        let mut out = Vec::new();
        let mut read_dir = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| HashError::ReadFailed {
                path: dir.display().to_string(),
                message: e.to_string(),
            })?;
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| HashError::ReadFailed {
                path: dir.display().to_string(),
                message: e.to_string(),
            })?
        {
            let path = entry.path();
            let rel = path
                .strip_prefix(root)
                .unwrap_or(&path)
                .to_path_buf();
            if path.is_dir() {
                out.extend(collect_entries(root, &path).await?);
            } else {
                out.push(rel);
            }
        }
        Ok(out)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(hash_bytes(b"hello"), hash_bytes(b"hello"));
        assert_ne!(hash_bytes(b"hello"), hash_bytes(b"world"));
    }

    #[test]
    fn hash_is_16_hex_digits() {
        assert_eq!(hash_bytes(b"anything").len(), 16);
    }

    #[tokio::test]
    async fn directory_hash_is_order_independent_of_read_dir_order() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("b.txt"), b"B").await.unwrap();
        tokio::fs::write(dir.path().join("a.txt"), b"A").await.unwrap();
        let h1 = hash_dir(dir.path()).await.unwrap();

        let dir2 = tempfile::tempdir().unwrap();
        tokio::fs::write(dir2.path().join("a.txt"), b"A").await.unwrap();
        tokio::fs::write(dir2.path().join("b.txt"), b"B").await.unwrap();
        let h2 = hash_dir(dir2.path()).await.unwrap();

        assert_eq!(h1, h2);
    }

    #[tokio::test]
    async fn directory_hash_changes_when_content_changes() {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("a.txt"), b"A").await.unwrap();
        let before = hash_dir(dir.path()).await.unwrap();
        tokio::fs::write(dir.path().join("a.txt"), b"A2").await.unwrap();
        let after = hash_dir(dir.path()).await.unwrap();
        assert_ne!(before, after);
    }
}
