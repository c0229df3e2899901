//! Lock file read/write/verify (§4.5, §5: "a lock file present at
//! invocation-start is treated as authoritative unless `--update` is set").
//!
//! `save` edits an existing `cforge.lock` document in place with `toml_edit`
//! rather than re-serializing the typed [`LockFile`] from scratch, so a
//! user's comments and blank lines survive the rewrite every `resolve_all`
//! performs (§6: "Comments and blank lines preserved through round-trip").

use cforge_errors::{Error, ResolverError};
use cforge_types::{LockEntry, LockFile};
use std::path::Path;
use toml_edit::{value, DocumentMut, Item, Table};

/// Load the lock file at `path`, returning `None` if it doesn't exist yet.
///
/// # Errors
/// Returns [`ResolverError::LockFileIo`] if the file exists but is not
/// valid TOML or doesn't match the lock file schema.
pub async fn load(path: &Path) -> Result<Option<LockFile>, Error> {
    match tokio::fs::read_to_string(path).await {
        Ok(contents) => {
            let lock: LockFile = toml::from_str(&contents).map_err(|e| ResolverError::LockFileIo {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
            Ok(Some(lock))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ResolverError::LockFileIo {
            path: path.display().to_string(),
            message: e.to_string(),
        }
        .into()),
    }
}

/// Persist `lock` to `path`, editing an existing document in place when one
/// is present so comments and blank lines survive the rewrite.
///
/// # Errors
/// Returns [`ResolverError::LockFileIo`] if the existing file isn't valid
/// TOML, if a `metadata`/`dependency`/`dependency.<name>` key is present but
/// not a table, or if the result cannot be written.
pub async fn save(path: &Path, lock: &LockFile) -> Result<(), Error> {
    let io_err = |message: String| {
        Error::from(ResolverError::LockFileIo {
            path: path.display().to_string(),
            message,
        })
    };

    let existing = match tokio::fs::read_to_string(path).await {
        Ok(contents) => Some(contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(io_err(e.to_string())),
    };

    let mut doc: DocumentMut = match existing {
        Some(text) => text.parse().map_err(|e: toml_edit::TomlError| io_err(e.to_string()))?,
        None => DocumentMut::new(),
    };

    let not_a_table = |key: &str| io_err(format!("`{key}` is present but is not a table"));

    {
        let metadata = doc
            .entry("metadata")
            .or_insert_with(|| Item::Table(Table::new()))
            .as_table_mut()
            .ok_or_else(|| not_a_table("metadata"))?;
        metadata["schema_version"] = value(i64::from(lock.metadata.schema_version));
        metadata["generated_at"] = value(lock.metadata.generated_at.as_str());
    }

    {
        let dep_root = doc
            .entry("dependency")
            .or_insert_with(|| Item::Table(Table::new()))
            .as_table_mut()
            .ok_or_else(|| not_a_table("dependency"))?;

        let stale: Vec<String> = dep_root
            .iter()
            .map(|(name, _)| name.to_string())
            .filter(|name| !lock.dependencies.contains_key(name))
            .collect();
        for name in stale {
            dep_root.remove(&name);
        }

        for (name, entry) in &lock.dependencies {
            let table = dep_root
                .entry(name)
                .or_insert_with(|| Item::Table(Table::new()))
                .as_table_mut()
                .ok_or_else(|| not_a_table(name))?;
            table["source"] = value(entry.source.as_str());
            table["url"] = value(entry.url.as_str());
            table["version"] = value(entry.version.as_str());
            table["resolved"] = value(entry.resolved.as_str());
            match &entry.checksum {
                Some(checksum) => table["checksum"] = value(checksum.as_str()),
                None => {
                    table.remove("checksum");
                }
            }
        }
    }

    tokio::fs::write(path, doc.to_string())
        .await
        .map_err(|e| io_err(e.to_string()))?;
    Ok(())
}

/// Verify that `entry` (freshly resolved) matches what's already recorded
/// for `name` in `lock`, if present.
///
/// # Errors
/// Returns [`ResolverError::LockVerificationFailed`] on a mismatch.
pub fn verify_entry(lock: &LockFile, name: &str, entry: &LockEntry) -> Result<(), Error> {
    if let Some(existing) = lock.get(name) {
        if existing.resolved != entry.resolved {
            return Err(ResolverError::LockVerificationFailed {
                name: name.to_string(),
                expected: existing.resolved.clone(),
                actual: entry.resolved.clone(),
            }
            .into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_lock_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(&dir.path().join("cforge.lock")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cforge.lock");
        let mut lock = LockFile::new("2026-07-28T00:00:00Z");
        lock.insert(
            "fmt",
            LockEntry {
                source: "registry".to_string(),
                url: "https://github.com/fmtlib/fmt".to_string(),
                version: "^10".to_string(),
                resolved: "10.2.1".to_string(),
                checksum: None,
            },
        );
        save(&path, &lock).await.unwrap();

        let loaded = load(&path).await.unwrap().unwrap();
        assert_eq!(loaded.get("fmt").unwrap().resolved, "10.2.1");
    }

    #[tokio::test]
    async fn save_preserves_comments_and_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cforge.lock");
        tokio::fs::write(
            &path,
            "# hand-written note: fmt is pinned for the upcoming release\n\
             [metadata]\n\
             schema_version = 1\n\
             generated_at = \"2026-01-01T00:00:00Z\"\n\
             \n\
             [dependency.fmt]\n\
             source = \"registry\"\n\
             url = \"https://github.com/fmtlib/fmt\"\n\
             version = \"^10\"\n\
             resolved = \"10.2.0\"\n",
        )
        .await
        .unwrap();

        let mut lock = LockFile::new("2026-07-28T00:00:00Z");
        lock.insert(
            "fmt",
            LockEntry {
                source: "registry".to_string(),
                url: "https://github.com/fmtlib/fmt".to_string(),
                version: "^10".to_string(),
                resolved: "10.2.1".to_string(),
                checksum: None,
            },
        );
        save(&path, &lock).await.unwrap();

        let rewritten = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(rewritten.contains("# hand-written note: fmt is pinned for the upcoming release"));
        assert!(rewritten.contains("resolved = \"10.2.1\""));

        let loaded = load(&path).await.unwrap().unwrap();
        assert_eq!(loaded.get("fmt").unwrap().resolved, "10.2.1");
    }

    #[tokio::test]
    async fn save_drops_stale_dependency_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cforge.lock");
        let mut first = LockFile::new("2026-07-28T00:00:00Z");
        first.insert(
            "fmt",
            LockEntry {
                source: "registry".to_string(),
                url: "https://github.com/fmtlib/fmt".to_string(),
                version: "^10".to_string(),
                resolved: "10.2.1".to_string(),
                checksum: None,
            },
        );
        save(&path, &first).await.unwrap();

        let second = LockFile::new("2026-07-29T00:00:00Z");
        save(&path, &second).await.unwrap();

        let loaded = load(&path).await.unwrap().unwrap();
        assert!(loaded.get("fmt").is_none());
    }

    #[test]
    fn verify_entry_detects_mismatch() {
        let mut lock = LockFile::new("2026-07-28T00:00:00Z");
        lock.insert(
            "fmt",
            LockEntry {
                source: "registry".to_string(),
                url: "https://github.com/fmtlib/fmt".to_string(),
                version: "^10".to_string(),
                resolved: "10.2.0".to_string(),
                checksum: None,
            },
        );
        let fresh = LockEntry {
            source: "registry".to_string(),
            url: "https://github.com/fmtlib/fmt".to_string(),
            version: "^10".to_string(),
            resolved: "10.2.1".to_string(),
            checksum: None,
        };
        let err = verify_entry(&lock, "fmt", &fresh).unwrap_err();
        assert!(matches!(
            err,
            Error::Resolver(ResolverError::LockVerificationFailed { .. })
        ));
    }
}
