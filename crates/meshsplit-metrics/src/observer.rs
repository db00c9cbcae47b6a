//! The observer contract and the query pipeline shared by backends.

use std::time::Duration;

use meshsplit_core::{MetricQueryModel, MetricsProvider};
use tracing::debug;

use crate::client::TelemetryClient;
use crate::error::{MetricsError, MetricsResult};
use crate::kind::MetricKind;
use crate::template;

/// Turns telemetry queries into canary health signals.
pub trait MetricsObserver: Send + Sync {
    /// Backend this observer queries.
    fn provider(&self) -> MetricsProvider;

    /// Backend-native query text for `metric`, rendered for `model`.
    fn render_query(&self, metric: MetricKind, model: &MetricQueryModel) -> MetricsResult<String>;

    /// Percentage of successful (non-5xx) canary requests, in `[0, 100]`.
    fn request_success_rate(&self, model: &MetricQueryModel) -> MetricsResult<f64>;

    /// P99 canary request latency.
    fn request_duration(&self, model: &MetricQueryModel) -> MetricsResult<Duration>;
}

/// Static metric kind → template table owned by one backend.
#[derive(Debug, Clone, Copy)]
pub struct QueryCatalog {
    provider: MetricsProvider,
    queries: &'static [(MetricKind, &'static str)],
}

impl QueryCatalog {
    pub const fn new(
        provider: MetricsProvider,
        queries: &'static [(MetricKind, &'static str)],
    ) -> Self {
        Self { provider, queries }
    }

    /// Template for `metric`.
    pub fn template(&self, metric: MetricKind) -> MetricsResult<&'static str> {
        self.queries
            .iter()
            .find(|(kind, _)| *kind == metric)
            .map(|(_, query)| *query)
            .ok_or(MetricsError::MissingQuery {
                provider: self.provider,
                metric,
            })
    }

    /// Render the template for `metric` against `model`.
    pub fn render(&self, metric: MetricKind, model: &MetricQueryModel) -> MetricsResult<String> {
        let text = self.template(metric)?;
        template::render(text, model).map_err(|source| MetricsError::Template { metric, source })
    }

    /// Render and execute the query for `metric`, returning its scalar.
    pub fn run(
        &self,
        client: &dyn TelemetryClient,
        metric: MetricKind,
        model: &MetricQueryModel,
    ) -> MetricsResult<f64> {
        let query = self.render(metric, model)?;
        let value = client
            .run_query(&query)
            .map_err(|e| MetricsError::execution(metric, e))?;

        if !value.is_finite() {
            return Err(MetricsError::QueryExecutionFailed {
                metric,
                reason: format!("query returned a non-numeric value ({value})"),
            });
        }

        debug!(
            provider = %self.provider,
            %metric,
            target = %model.target,
            value,
            "metric query executed"
        );
        Ok(value)
    }
}

/// Clamp a success-rate percentage into `[0, 100]`.
pub fn success_rate(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Convert a latency reported in milliseconds into a `Duration`, keeping
/// microsecond precision.
pub fn duration_from_millis(metric: MetricKind, millis: f64) -> MetricsResult<Duration> {
    if millis < 0.0 {
        return Err(MetricsError::QueryExecutionFailed {
            metric,
            reason: format!("negative latency ({millis}ms)"),
        });
    }
    Ok(Duration::from_micros((millis * 1000.0).round() as u64))
}
