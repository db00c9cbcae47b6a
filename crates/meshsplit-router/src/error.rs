//! Router error types.

use meshsplit_core::{ClientError, CoreError, MeshProvider, RolloutTarget};
use thiserror::Error;

/// Errors that can occur while managing routing resources.
///
/// Every variant carries the apex name and namespace of the rollout
/// target the failing call was made for. `kind` names the backend
/// resource involved, in the backend's own vocabulary.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("{kind} {apex}.{namespace} not found")]
    NotFound {
        kind: &'static str,
        apex: String,
        namespace: String,
    },

    #[error("failed to read {kind} {apex}.{namespace}: {source}")]
    Read {
        kind: &'static str,
        apex: String,
        namespace: String,
        #[source]
        source: ClientError,
    },

    #[error("failed to write {kind} {apex}.{namespace}: {reason}")]
    WriteFailed {
        kind: &'static str,
        apex: String,
        namespace: String,
        reason: String,
    },

    #[error("invalid routing config for {apex}.{namespace}: {reason}")]
    ConfigInvalid {
        apex: String,
        namespace: String,
        reason: String,
    },

    #[error("{operation} is not supported by the {provider} router ({apex}.{namespace})")]
    Unsupported {
        operation: &'static str,
        provider: MeshProvider,
        apex: String,
        namespace: String,
    },
}

impl RouterError {
    pub(crate) fn not_found(kind: &'static str, target: &RolloutTarget) -> Self {
        Self::NotFound {
            kind,
            apex: target.apex_name.clone(),
            namespace: target.namespace.clone(),
        }
    }

    pub(crate) fn read(kind: &'static str, target: &RolloutTarget, source: ClientError) -> Self {
        Self::Read {
            kind,
            apex: target.apex_name.clone(),
            namespace: target.namespace.clone(),
            source,
        }
    }

    pub(crate) fn write_failed(kind: &'static str, target: &RolloutTarget, reason: impl Into<String>) -> Self {
        Self::WriteFailed {
            kind,
            apex: target.apex_name.clone(),
            namespace: target.namespace.clone(),
            reason: reason.into(),
        }
    }

    pub(crate) fn config_invalid(target: &RolloutTarget, reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            apex: target.apex_name.clone(),
            namespace: target.namespace.clone(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_weights(target: &RolloutTarget, err: CoreError) -> Self {
        Self::config_invalid(target, err.to_string())
    }

    pub(crate) fn unsupported(
        operation: &'static str,
        provider: MeshProvider,
        target: &RolloutTarget,
    ) -> Self {
        Self::Unsupported {
            operation,
            provider,
            apex: target.apex_name.clone(),
            namespace: target.namespace.clone(),
        }
    }

    /// True for the "resource does not exist yet" case, which callers may
    /// treat as a signal to reconcile rather than as a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias for router operations.
pub type RouterResult<T> = Result<T, RouterError>;
