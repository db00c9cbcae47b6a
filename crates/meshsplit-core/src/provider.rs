//! Backend identifiers used to select router and observer implementations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Mesh control plane that realizes the traffic split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeshProvider {
    /// Consul Connect service resolver + splitter entries.
    Connect,
    /// No load-balanced traffic to manage (plain Kubernetes workloads).
    #[serde(alias = "kubernetes")]
    Noop,
}

impl MeshProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Noop => "noop",
        }
    }
}

impl fmt::Display for MeshProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeshProvider {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "connect" | "consul" => Ok(Self::Connect),
            "noop" | "kubernetes" => Ok(Self::Noop),
            other => Err(CoreError::UnknownProvider(other.to_string())),
        }
    }
}

/// Telemetry backend that answers analysis queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricsProvider {
    /// Envoy sidecar metrics emitted under Consul Connect.
    Connect,
}

impl MetricsProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connect => "connect",
        }
    }
}

impl fmt::Display for MetricsProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricsProvider {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "connect" | "consul" => Ok(Self::Connect),
            other => Err(CoreError::UnknownProvider(other.to_string())),
        }
    }
}
