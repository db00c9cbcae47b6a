//! Observer selection by metrics provider.

use std::sync::Arc;

use meshsplit_core::MetricsProvider;

use crate::client::TelemetryClient;
use crate::connect::ConnectObserver;
use crate::observer::MetricsObserver;

/// Builds observers for a metrics provider, sharing one telemetry client.
pub struct ObserverFactory {
    client: Arc<dyn TelemetryClient>,
}

impl ObserverFactory {
    pub fn new(client: Arc<dyn TelemetryClient>) -> Self {
        Self { client }
    }

    /// Observer for `provider`.
    pub fn observer(&self, provider: MetricsProvider) -> Box<dyn MetricsObserver> {
        match provider {
            MetricsProvider::Connect => Box::new(ConnectObserver::new(self.client.clone())),
        }
    }
}
