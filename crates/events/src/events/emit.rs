use serde::{Deserialize, Serialize};

/// CMake Emitter events (component I, plus the Content Hasher gate).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EmitEvent {
    /// The manifest's content hash matched the cache; emission was skipped.
    SkippedUpToDate { project: String, path: String },

    /// `CMakeLists.txt` rendering began.
    Started { project: String, path: String },

    /// `CMakeLists.txt` was (re)written to disk.
    Written {
        project: String,
        path: String,
        bytes: usize,
    },

    /// Rendering failed (should only happen for I/O errors; the writer
    /// functions themselves are infallible pure string builders).
    Failed {
        project: String,
        failure: super::FailureContext,
    },
}
