//! Fixed, non-configurable filesystem locations for the cforge tool config
//! (distinct from any single project's `cforge.toml`).

/// Directory under the user's config dir holding cforge's own state.
pub const CONFIG_DIR_NAME: &str = "cforge";

/// Global tool configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Registry metadata cache file name (component F: Registry Client).
pub const REGISTRY_CACHE_FILE_NAME: &str = "registry-cache.toml";

/// Default dependencies directory, relative to a project root (§9 Open
/// Question: `deps`, not `vendor` — see DESIGN.md).
pub const DEFAULT_DEPENDENCIES_DIRECTORY: &str = "deps";

/// Default per-input hash cache file name, relative to a project root (§6).
pub const DEFAULT_HASH_CACHE_FILE_NAME: &str = "cforge.hash";

/// Default lock file name, relative to a project root (§6).
pub const DEFAULT_LOCK_FILE_NAME: &str = "cforge.lock";

/// Default manifest file name.
pub const MANIFEST_FILE_NAME: &str = "cforge.toml";

/// Legacy standalone workspace manifest file name (§4.1, §9).
pub const LEGACY_WORKSPACE_FILE_NAME: &str = "cforge.workspace.toml";
