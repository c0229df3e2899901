use serde::{Deserialize, Serialize};

/// Manifest Loader events (component A).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ManifestEvent {
    /// A project or workspace manifest load began.
    LoadStarted { path: String },

    /// A manifest loaded successfully, carrying any non-fatal diagnostics
    /// (unknown keys, deprecated overlay forms, legacy-file shadowing).
    LoadCompleted {
        path: String,
        name: String,
        warnings: Vec<String>,
    },

    /// A manifest failed to parse or validate.
    LoadFailed {
        path: String,
        failure: super::FailureContext,
    },

    /// One non-fatal diagnostic surfaced during loading (unknown key,
    /// deprecated `build.configs` form, legacy workspace file shadowing).
    Diagnostic { path: String, message: String },
}
