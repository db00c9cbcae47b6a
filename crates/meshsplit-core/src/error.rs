//! Error types shared across meshsplit crates.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while constructing core values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid route weights: {0}")]
    InvalidWeights(String),

    #[error("unknown provider: {0}")]
    UnknownProvider(String),
}

/// Transport-level failure reported by an outbound backend client.
///
/// Mesh and telemetry clients are external collaborators; their failures
/// are carried as opaque messages and wrapped with call context by the
/// router or observer that issued the call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ClientError(pub String);

impl ClientError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}
