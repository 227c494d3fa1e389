//! Error types for task graph operations.

/// Result type for task graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, validating, or ordering a task graph.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// An edge references a node that was never declared.
    #[error("edge '{from}' -> '{to}' references unknown node '{node}'")]
    UnknownNode {
        /// Source endpoint of the offending edge.
        from: String,
        /// Target endpoint of the offending edge.
        to: String,
        /// The endpoint that does not exist in the graph.
        node: String,
    },

    /// The graph contains a dependency cycle.
    #[error("dependency cycle detected: {}", .cycle.join(" -> "))]
    Cycle {
        /// One offending cycle as a closed walk. The first id is repeated at
        /// the end, so `[X, Y, Z, X]` means X -> Y -> Z -> X.
        cycle: Vec<String>,
    },
}
