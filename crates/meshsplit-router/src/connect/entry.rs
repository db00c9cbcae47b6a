//! Connect config entries managed by the router.
//!
//! Field names serialize in the control plane's PascalCase JSON form so
//! entries can be printed or sent as-is.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Kinds of config entry the router reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryKind {
    ServiceResolver,
    ServiceSplitter,
}

impl EntryKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ServiceResolver => "service-resolver",
            Self::ServiceSplitter => "service-splitter",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A config entry stored in the control plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Kind", rename_all = "kebab-case")]
pub enum ConfigEntry {
    ServiceResolver(ServiceResolver),
    ServiceSplitter(ServiceSplitter),
}

impl ConfigEntry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Self::ServiceResolver(_) => EntryKind::ServiceResolver,
            Self::ServiceSplitter(_) => EntryKind::ServiceSplitter,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::ServiceResolver(r) => &r.name,
            Self::ServiceSplitter(s) => &s.name,
        }
    }
}

// ── Resolver ───────────────────────────────────────────────────────

/// Defines the subsets of a service and where each fails over to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceResolver {
    pub name: String,
    pub default_subset: String,
    pub subsets: BTreeMap<String, ResolverSubset>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub failover: BTreeMap<String, ResolverFailover>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResolverSubset {
    pub filter: String,
}

/// Remote datacenters to use when a subset has no healthy local
/// instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResolverFailover {
    pub service: String,
    pub service_subset: String,
    pub datacenters: Vec<String>,
}

// ── Splitter ───────────────────────────────────────────────────────

/// Weighted traffic distribution across the subsets of a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceSplitter {
    pub name: String,
    #[serde(default)]
    pub splits: Vec<ServiceSplit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceSplit {
    pub weight: f32,
    pub service: String,
    pub service_subset: String,
}

impl ServiceSplitter {
    /// Weight assigned to `subset`, if the splitter has an entry for it.
    /// With duplicate entries the last one wins.
    pub fn weight_of(&self, subset: &str) -> Option<f32> {
        self.splits
            .iter()
            .rev()
            .find(|s| s.service_subset == subset)
            .map(|s| s.weight)
    }
}
