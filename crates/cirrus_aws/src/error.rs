//! Error types for the AWS bindings.

use thiserror::Error;

/// Result type alias for AWS binding operations.
pub type AwsResult<T> = Result<T, AwsError>;

/// Errors raised while declaring AWS resources.
///
/// Declaration-time failures are limited to malformed graph construction;
/// everything about provisioning is judged by the external engine.
#[derive(Error, Debug)]
pub enum AwsError {
    #[error("Invalid scaling bounds: min {min} exceeds max {max}")]
    InvalidScalingBounds { min: u32, max: u32 },

    #[error("Graph error: {0}")]
    Graph(#[from] cirrus_graph::GraphError),
}
