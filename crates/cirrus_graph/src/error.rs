//! Error types for the graph module.

use thiserror::Error;

/// Result type alias for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors that can occur while building or synthesizing the resource graph.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Duplicate logical id in stack {stack}: {logical_id}")]
    DuplicateLogicalId { stack: String, logical_id: String },

    #[error("Unknown resource referenced from stack {stack}: {reference}")]
    UnknownResource { stack: String, reference: String },

    #[error("Stack declares no resources: {0}")]
    EmptyStack(String),

    #[error("Duplicate stack name: {0}")]
    DuplicateStack(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
