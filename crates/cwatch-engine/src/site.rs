//! Site configuration loading.

use std::path::Path;

use cwatch_models::SiteConfig;
use tracing::info;

use crate::error::{EngineError, EngineResult};

/// Load and validate the site configuration from a JSON file.
///
/// Any problem here aborts startup; configuration never fails inside the
/// polling loop.
pub fn load_site_config(path: impl AsRef<Path>) -> EngineResult<SiteConfig> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|e| {
        EngineError::config(format!("cannot read site config {}: {}", path.display(), e))
    })?;

    let site: SiteConfig = serde_json::from_str(&raw)
        .map_err(|e| EngineError::config(format!("invalid site config {}: {}", path.display(), e)))?;
    site.validate()?;

    info!(
        cameras = site.cameras.len(),
        zones = site.zones.len(),
        dry_run = site.settings.dry_run,
        "Loaded site configuration"
    );
    Ok(site)
}
