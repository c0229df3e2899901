//! Integration tests for cforge-hash

#[cfg(test)]
mod tests {
    use cforge_hash::{hash_directory, hash_path, load_or_default, save};
    use cforge_types::HashCache;
    use tokio::fs;

    #[tokio::test]
    async fn hash_path_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("cforge.toml");
        fs::write(&file_path, b"name = \"app\"").await.unwrap();

        let h1 = hash_path(&file_path).await.unwrap();
        let h2 = hash_path(&file_path).await.unwrap();
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 16);
    }

    #[tokio::test]
    async fn hash_directory_reflects_tree_contents() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("include")).await.unwrap();
        fs::write(dir.path().join("include/a.hpp"), b"struct A {};")
            .await
            .unwrap();

        let before = hash_directory(dir.path()).await.unwrap();
        fs::write(dir.path().join("include/a.hpp"), b"struct A { int x; };")
            .await
            .unwrap();
        let after = hash_directory(dir.path()).await.unwrap();
        assert_ne!(before, after);
    }

    #[tokio::test]
    async fn cache_round_trips_and_supports_incremental_skip() {
        let dir = tempfile::tempdir().unwrap();
        let cache_path = dir.path().join("cforge.hash");

        let mut cache = HashCache::new();
        let manifest_hash = cforge_hash::hash_bytes(b"name = \"app\"");
        cache.set_config_hash("cforge.toml", &manifest_hash);
        save(&cache_path, &cache).await.unwrap();

        let loaded = load_or_default(&cache_path).await;
        assert!(loaded.config_matches("cforge.toml", &manifest_hash));
        assert!(!loaded.config_matches("cforge.toml", "stale"));
    }

    #[tokio::test]
    async fn missing_cache_loads_as_empty_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = load_or_default(&dir.path().join("missing.hash")).await;
        assert!(cache.config.is_empty());
        assert!(cache.dependencies.is_empty());
    }
}
