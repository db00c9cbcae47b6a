//! meshsplit.toml configuration parser.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::provider::{MeshProvider, MetricsProvider};
use crate::types::{MetricQueryModel, RolloutTarget};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshsplitConfig {
    pub router: RouterConfig,
    pub metrics: MetricsConfig,
    pub target: Option<TargetConfig>,
    pub analysis: Option<AnalysisConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    pub provider: MeshProvider,
    /// Name of the datacenter this controller runs in. Excluded from
    /// failover targets; when unset the first discovered datacenter is
    /// assumed to be local.
    pub local_datacenter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub provider: MetricsProvider,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    pub name: String,
    pub namespace: String,
    pub primary: Option<String>,
    pub canary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub interval: String,
    pub variables: Option<BTreeMap<String, String>>,
}

impl TargetConfig {
    pub fn rollout_target(&self) -> RolloutTarget {
        let mut target = RolloutTarget::from_name(&self.name, &self.namespace);
        if let Some(primary) = &self.primary {
            target.primary_name = primary.clone();
        }
        if let Some(canary) = &self.canary {
            target.canary_name = canary.clone();
        }
        target
    }
}

impl MeshsplitConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: MeshsplitConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Query model for the configured target, if both a target and an
    /// analysis section are present.
    pub fn query_model(&self) -> Option<MetricQueryModel> {
        let target = self.target.as_ref()?.rollout_target();
        let analysis = self.analysis.as_ref()?;
        let mut model = MetricQueryModel::for_target(&target, &analysis.interval);
        if let Some(vars) = &analysis.variables {
            model.variables.extend(vars.clone());
        }
        Some(model)
    }

    /// Scaffold a minimal meshsplit.toml for a Connect-managed workload.
    pub fn scaffold(name: &str, namespace: &str) -> Self {
        MeshsplitConfig {
            router: RouterConfig {
                provider: MeshProvider::Connect,
                local_datacenter: None,
            },
            metrics: MetricsConfig {
                provider: MetricsProvider::Connect,
            },
            target: Some(TargetConfig {
                name: name.to_string(),
                namespace: namespace.to_string(),
                primary: None,
                canary: None,
            }),
            analysis: Some(AnalysisConfig {
                interval: "1m".to_string(),
                variables: None,
            }),
        }
    }
}
