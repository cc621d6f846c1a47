//! Configuration file loading.
//!
//! ```toml
//! id_strategy = "sequential"
//! placement_seed = 42
//! reject_lineage_cycles = true
//!
//! [canvas]
//! origin_x = 100.0
//! origin_y = 100.0
//! width = 400.0
//! height = 300.0
//! ```

use anyhow::Context;
use kinship_core::TreeConfig;
use std::path::Path;

/// Load a TOML config, or defaults when no path is given.
pub(crate) async fn load(path: Option<&Path>) -> anyhow::Result<TreeConfig> {
    let Some(path) = path else {
        return Ok(TreeConfig::default());
    };
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = parse(&text).with_context(|| format!("parsing config {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?config, "loaded config");
    Ok(config)
}

fn parse(text: &str) -> Result<TreeConfig, toml::de::Error> {
    toml::from_str(text)
}
