//! Observer for Envoy sidecar metrics under Consul Connect.
//!
//! Sidecars export `envoy_cluster_upstream_rq*` series labelled with the
//! destination `consul_service` and `consul_service_subset`; both queries
//! look at the `canary` subset only.

use std::sync::Arc;
use std::time::Duration;

use meshsplit_core::{MetricQueryModel, MetricsProvider};

use crate::client::TelemetryClient;
use crate::error::MetricsResult;
use crate::kind::MetricKind;
use crate::observer::{MetricsObserver, QueryCatalog, duration_from_millis, success_rate};

const SUCCESS_RATE_QUERY: &str = r#"
	sum(
		rate(
			envoy_cluster_upstream_rq{
				consul_service="{{ target }}",
				consul_service_subset="canary",
				envoy_response_code!~"5.*"
			}[{{ interval }}]
		)
	)
	/
	sum(
		rate(
			envoy_cluster_upstream_rq{
				consul_service="{{ target }}",
				consul_service_subset="canary"
			}[{{ interval }}]
		)
	)
	* 100"#;

// Envoy reports upstream request time in milliseconds.
const DURATION_QUERY: &str = r#"
	histogram_quantile(
		0.99,
		sum(
			rate(
				envoy_cluster_upstream_rq_time_bucket{
					consul_service="{{ target }}",
					consul_service_subset="canary"
				}[{{ interval }}]
			)
		) by (le)
	)"#;

const CONNECT_QUERIES: QueryCatalog = QueryCatalog::new(
    MetricsProvider::Connect,
    &[
        (MetricKind::RequestSuccessRate, SUCCESS_RATE_QUERY),
        (MetricKind::RequestDuration, DURATION_QUERY),
    ],
);

/// Metrics observer for Connect-managed workloads.
pub struct ConnectObserver {
    client: Arc<dyn TelemetryClient>,
}

impl ConnectObserver {
    pub fn new(client: Arc<dyn TelemetryClient>) -> Self {
        Self { client }
    }
}

impl MetricsObserver for ConnectObserver {
    fn provider(&self) -> MetricsProvider {
        MetricsProvider::Connect
    }

    fn render_query(&self, metric: MetricKind, model: &MetricQueryModel) -> MetricsResult<String> {
        CONNECT_QUERIES.render(metric, model)
    }

    fn request_success_rate(&self, model: &MetricQueryModel) -> MetricsResult<f64> {
        let value = CONNECT_QUERIES.run(self.client.as_ref(), MetricKind::RequestSuccessRate, model)?;
        Ok(success_rate(value))
    }

    fn request_duration(&self, model: &MetricQueryModel) -> MetricsResult<Duration> {
        let millis = CONNECT_QUERIES.run(self.client.as_ref(), MetricKind::RequestDuration, model)?;
        duration_from_millis(MetricKind::RequestDuration, millis)
    }
}
