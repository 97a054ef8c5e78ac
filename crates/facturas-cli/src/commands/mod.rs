//! CLI subcommands.

pub mod config;
pub mod consolidate;
pub mod process;

use std::path::Path;

use tracing::debug;

use facturas_core::FacturasConfig;

/// Load the `--config` file, else the default config file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FacturasConfig> {
    if let Some(path) = config_path {
        debug!("Loading configuration from {}", path);
        return Ok(FacturasConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Loading configuration from {}", default_path.display());
        Ok(FacturasConfig::from_file(&default_path)?)
    } else {
        Ok(FacturasConfig::default())
    }
}
