//! Domain types shared by routers and metrics observers.
//!
//! These values cross the boundary between the external rollout
//! controller and the traffic-control core. None of them are persisted
//! here; the controller builds them fresh for every call.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Weights at or below this value are treated as zero and are never
/// written to a backend.
pub const WEIGHT_EPSILON: f64 = 0.1;

/// Upper bound for a single route weight.
pub const MAX_WEIGHT: u32 = 100;

// ── Rollout target ─────────────────────────────────────────────────

/// The apex/primary/canary naming triple for one rollout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RolloutTarget {
    /// Stable, externally addressed service name.
    pub apex_name: String,
    /// Service name of the stable workload.
    pub primary_name: String,
    /// Service name of the experimental workload.
    pub canary_name: String,
    pub namespace: String,
}

impl RolloutTarget {
    pub fn new(
        apex_name: &str,
        primary_name: &str,
        canary_name: &str,
        namespace: &str,
    ) -> Self {
        Self {
            apex_name: apex_name.to_string(),
            primary_name: primary_name.to_string(),
            canary_name: canary_name.to_string(),
            namespace: namespace.to_string(),
        }
    }

    /// Derive the conventional triple from a workload name:
    /// `name`, `name-primary`, `name-canary`.
    pub fn from_name(name: &str, namespace: &str) -> Self {
        Self::new(
            name,
            &format!("{name}-primary"),
            &format!("{name}-canary"),
            namespace,
        )
    }
}

impl fmt::Display for RolloutTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.apex_name, self.namespace)
    }
}

// ── Route weights ──────────────────────────────────────────────────

/// Traffic split between the primary and canary subsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteWeights {
    pub primary: u32,
    pub canary: u32,
    /// Mirror canary traffic instead of splitting it. Backends that
    /// cannot express mirroring ignore this flag.
    #[serde(default)]
    pub mirror: bool,
}

impl RouteWeights {
    /// Build a weight pair, rejecting values that could never be an
    /// established split.
    pub fn new(primary: u32, canary: u32, mirror: bool) -> CoreResult<Self> {
        let weights = Self {
            primary,
            canary,
            mirror,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// All traffic on the primary. Written on first reconciliation.
    pub fn bootstrap() -> Self {
        Self {
            primary: MAX_WEIGHT,
            canary: 0,
            mirror: false,
        }
    }

    /// Check the range and the "not both zero" invariant.
    pub fn validate(&self) -> CoreResult<()> {
        if self.primary > MAX_WEIGHT || self.canary > MAX_WEIGHT {
            return Err(CoreError::InvalidWeights(format!(
                "weights must be within 0..={MAX_WEIGHT}, got primary={} canary={}",
                self.primary, self.canary
            )));
        }
        if !exceeds_epsilon(f64::from(self.primary)) && !exceeds_epsilon(f64::from(self.canary)) {
            return Err(CoreError::InvalidWeights(
                "primary and canary weights are both zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for RouteWeights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "primary={} canary={}", self.primary, self.canary)?;
        if self.mirror {
            write!(f, " (mirror)")?;
        }
        Ok(())
    }
}

/// True when a weight is large enough to be persisted.
pub fn exceeds_epsilon(weight: f64) -> bool {
    weight > WEIGHT_EPSILON
}

// ── Metric query model ─────────────────────────────────────────────

/// Named values used to parametrize one telemetry query.
///
/// Empty strings are treated as absent fields by template rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricQueryModel {
    /// Name of the analysed rollout.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    /// Identity the query addresses (usually the apex service).
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub service: String,
    /// Sampling window in the backend's duration syntax, e.g. `1m`.
    #[serde(default)]
    pub interval: String,
    /// Optional extra fields, addressed as `variables.<key>`.
    #[serde(default)]
    pub variables: BTreeMap<String, String>,
}

impl MetricQueryModel {
    pub fn new(target: &str, namespace: &str, interval: &str) -> Self {
        Self {
            name: target.to_string(),
            namespace: namespace.to_string(),
            target: target.to_string(),
            service: target.to_string(),
            interval: interval.to_string(),
            variables: BTreeMap::new(),
        }
    }

    /// Model for analysing `target` over `interval`.
    pub fn for_target(target: &RolloutTarget, interval: &str) -> Self {
        Self::new(&target.apex_name, &target.namespace, interval)
    }

    pub fn with_variable(mut self, key: &str, value: &str) -> Self {
        self.variables.insert(key.to_string(), value.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_from_name_uses_suffixes() {
        let target = RolloutTarget::from_name("podinfo", "test");
        assert_eq!(target.apex_name, "podinfo");
        assert_eq!(target.primary_name, "podinfo-primary");
        assert_eq!(target.canary_name, "podinfo-canary");
        assert_eq!(target.to_string(), "podinfo.test");
    }

    #[test]
    fn weights_reject_both_zero() {
        let err = RouteWeights::new(0, 0, false).unwrap_err();
        assert!(matches!(err, CoreError::InvalidWeights(_)));
    }

    #[test]
    fn weights_reject_out_of_range() {
        assert!(RouteWeights::new(101, 0, false).is_err());
        assert!(RouteWeights::new(0, 250, false).is_err());
    }

    #[test]
    fn weights_accept_full_canary() {
        let w = RouteWeights::new(0, 100, true).unwrap();
        assert_eq!(w.canary, 100);
        assert!(w.mirror);
        assert_eq!(w.to_string(), "primary=0 canary=100 (mirror)");
    }

    #[test]
    fn bootstrap_routes_everything_to_primary() {
        let w = RouteWeights::bootstrap();
        assert_eq!((w.primary, w.canary, w.mirror), (100, 0, false));
        assert!(w.validate().is_ok());
    }

    #[test]
    fn epsilon_boundary() {
        assert!(!exceeds_epsilon(0.0));
        assert!(!exceeds_epsilon(0.1));
        assert!(exceeds_epsilon(0.5));
    }

    #[test]
    fn model_for_target_addresses_apex() {
        let target = RolloutTarget::from_name("podinfo", "test");
        let model = MetricQueryModel::for_target(&target, "1m").with_variable("region", "eu");
        assert_eq!(model.target, "podinfo");
        assert_eq!(model.namespace, "test");
        assert_eq!(model.interval, "1m");
        assert_eq!(model.variables.get("region").map(String::as_str), Some("eu"));
    }
}
