//! Metrics observer error types.

use meshsplit_core::{ClientError, MetricsProvider};
use thiserror::Error;

use crate::kind::MetricKind;
use crate::template::TemplateError;

/// Errors that can occur while evaluating an analysis metric.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("rendering {metric} query failed: {source}")]
    Template {
        metric: MetricKind,
        #[source]
        source: TemplateError,
    },

    #[error("running {metric} query failed: {reason}")]
    QueryExecutionFailed { metric: MetricKind, reason: String },

    #[error("the {provider} observer has no {metric} query")]
    MissingQuery {
        provider: MetricsProvider,
        metric: MetricKind,
    },

    #[error("unknown metric kind: {0}")]
    UnknownMetric(String),
}

impl MetricsError {
    pub(crate) fn execution(metric: MetricKind, err: ClientError) -> Self {
        Self::QueryExecutionFailed {
            metric,
            reason: err.to_string(),
        }
    }
}

/// Result type alias for metrics operations.
pub type MetricsResult<T> = Result<T, MetricsError>;
