//! `meshsplit plan` — dry-run reconciliation.
//!
//! Runs the configured router against an in-memory control plane seeded
//! with the given datacenters and prints the config entries it would
//! write, as JSON.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use meshsplit_core::{MeshProvider, MeshsplitConfig, RouteWeights};
use meshsplit_router::{InMemoryControlPlane, RouterFactory};
use serde_json::json;
use tracing::info;

/// Run the `meshsplit plan` command.
pub fn plan(config_path: &str, datacenters: &[String], weights: Option<(u32, u32)>) -> Result<()> {
    let config = MeshsplitConfig::from_file(Path::new(config_path))
        .with_context(|| format!("loading {config_path}"))?;
    let output = build_plan(&config, datacenters, weights)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Reconcile the configured target (and optionally apply weights),
/// returning the resulting control plane state.
pub fn build_plan(
    config: &MeshsplitConfig,
    datacenters: &[String],
    weights: Option<(u32, u32)>,
) -> Result<serde_json::Value> {
    let target = config
        .target
        .as_ref()
        .context("config has no [target] section")?
        .rollout_target();

    let plane = Arc::new(InMemoryControlPlane::with_datacenters(datacenters));
    let router = RouterFactory::from_config(plane.clone(), &config.router).router(config.router.provider);

    router.initialize(&target)?;
    router.reconcile(&target)?;
    info!(provider = %router.provider(), target = %target, "reconciled");

    if let Some((primary, canary)) = weights {
        let weights = RouteWeights::new(primary, canary, false)?;
        router
            .set_routes(&target, weights)
            .with_context(|| format!("applying {weights}"))?;
    }

    let routes = match router.provider() {
        MeshProvider::Noop => None,
        _ => Some(router.get_routes(&target)?),
    };

    Ok(json!({
        "provider": router.provider(),
        "target": target,
        "routes": routes,
        "entries": plane.entries(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_bootstraps_connect_entries() {
        let config = MeshsplitConfig::scaffold("podinfo", "test");
        let dcs = vec!["dc1".to_string(), "dc2".to_string()];
        let out = build_plan(&config, &dcs, None).unwrap();

        assert_eq!(out["provider"], "connect");
        assert_eq!(out["routes"]["primary"], 100);
        assert_eq!(out["routes"]["canary"], 0);

        let entries = out["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["Kind"], "service-resolver");
        assert_eq!(entries[0]["Failover"]["canary"]["Datacenters"][0], "dc2");
        assert_eq!(entries[1]["Kind"], "service-splitter");
    }

    #[test]
    fn plan_applies_weights() {
        let config = MeshsplitConfig::scaffold("podinfo", "test");
        let out = build_plan(&config, &[], Some((80, 20))).unwrap();
        assert_eq!(out["routes"]["primary"], 80);
        assert_eq!(out["routes"]["canary"], 20);
    }

    #[test]
    fn noop_plan_writes_nothing() {
        let mut config = MeshsplitConfig::scaffold("worker", "batch");
        config.router.provider = MeshProvider::Noop;
        let out = build_plan(&config, &[], None).unwrap();
        assert!(out["routes"].is_null());
        assert!(out["entries"].as_array().unwrap().is_empty());

        assert!(build_plan(&config, &[], Some((90, 10))).is_err());
    }
}
