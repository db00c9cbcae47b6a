//! `meshsplit query` — render an analysis query without running it.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use meshsplit_core::MeshsplitConfig;
use meshsplit_metrics::{MetricKind, ObserverFactory, StaticTelemetryClient};

/// Run the `meshsplit query` command.
pub fn query(config_path: &str, metric: &str) -> Result<()> {
    let config = MeshsplitConfig::from_file(Path::new(config_path))
        .with_context(|| format!("loading {config_path}"))?;
    println!("{}", render(&config, metric)?);
    Ok(())
}

/// Render the configured provider's query for `metric`.
pub fn render(config: &MeshsplitConfig, metric: &str) -> Result<String> {
    let kind: MetricKind = metric.parse()?;
    let model = config
        .query_model()
        .context("config needs both [target] and [analysis] sections")?;

    // Rendering never reaches the backend.
    let observer = ObserverFactory::new(Arc::new(StaticTelemetryClient::new()))
        .observer(config.metrics.provider);
    Ok(observer.render_query(kind, &model)?.trim().to_string())
}
