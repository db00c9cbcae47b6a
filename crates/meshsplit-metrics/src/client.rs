//! Telemetry backend clients.

use std::sync::{PoisonError, RwLock};

use meshsplit_core::ClientError;
use tracing::debug;

/// Executes a rendered query against a telemetry backend and returns its
/// single scalar result.
pub trait TelemetryClient: Send + Sync {
    fn run_query(&self, query: &str) -> Result<f64, ClientError>;
}

/// Telemetry client answering from canned responses.
///
/// A response is selected by the first registered fragment the query
/// contains. Every executed query is recorded. Used for dry runs and
/// tests.
#[derive(Debug, Default)]
pub struct StaticTelemetryClient {
    responses: RwLock<Vec<(String, Result<f64, String>)>>,
    executed: RwLock<Vec<String>>,
}

impl StaticTelemetryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer queries containing `fragment` with `value`.
    pub fn respond(&self, fragment: &str, value: f64) -> &Self {
        self.responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((fragment.to_string(), Ok(value)));
        self
    }

    /// Fail queries containing `fragment` with `msg`.
    pub fn fail(&self, fragment: &str, msg: &str) -> &Self {
        self.responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((fragment.to_string(), Err(msg.to_string())));
        self
    }

    /// Queries executed so far, oldest first.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TelemetryClient for StaticTelemetryClient {
    fn run_query(&self, query: &str) -> Result<f64, ClientError> {
        self.executed
            .write()
            .map_err(|_| ClientError::new("query log lock poisoned"))?
            .push(query.to_string());

        let responses = self
            .responses
            .read()
            .map_err(|_| ClientError::new("response table lock poisoned"))?;
        let response = responses
            .iter()
            .find(|(fragment, _)| query.contains(fragment.as_str()))
            .map(|(_, r)| r.clone());

        debug!(found = response.is_some(), "static telemetry query");
        match response {
            Some(result) => result.map_err(ClientError::new),
            None => Err(ClientError::new("no values found")),
        }
    }
}
