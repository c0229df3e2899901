use serde::{Deserialize, Serialize};

/// Include-Graph Analyzer events (component K).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AnalyzerEvent {
    /// File scan under the project root began.
    ScanStarted { project: String, file_count: usize },

    /// DFS cycle detection found one chain.
    CycleFound { chain: Vec<String> },

    /// Analysis completed with the total chain count.
    Completed { project: String, total_chains: usize },
}
