//! `meshsplit init` — scaffold a meshsplit.toml.

use std::path::Path;

use anyhow::{Context, Result, bail};
use meshsplit_core::MeshsplitConfig;
use tracing::info;

pub const CONFIG_FILE: &str = "meshsplit.toml";

/// Write a scaffold config for `name` into `dir`. Refuses to overwrite an
/// existing file.
pub fn init(dir: &str, name: &str, namespace: &str) -> Result<()> {
    let path = Path::new(dir).join(CONFIG_FILE);
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    let config = MeshsplitConfig::scaffold(name, namespace);
    std::fs::write(&path, config.to_toml_string()?)
        .with_context(|| format!("writing {}", path.display()))?;

    info!("Wrote {}", path.display());
    Ok(())
}
