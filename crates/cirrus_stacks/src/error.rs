//! Error types for the deployment units.

use thiserror::Error;

/// Result type alias for deployment unit operations.
pub type StackResult<T> = Result<T, StackError>;

/// Errors raised while composing the deployment.
#[derive(Error, Debug)]
pub enum StackError {
    #[error("AWS binding error: {0}")]
    Aws(#[from] cirrus_aws::AwsError),

    #[error("Graph error: {0}")]
    Graph(#[from] cirrus_graph::GraphError),
}
