//! Deployment self-check for the watcher daemon.
//!
//! Validates the site configuration and probes each collaborator's health
//! endpoint, then exits. Intended for container healthchecks and manual
//! smoke tests after a deploy.

use cwatch_clients::{HttpCameraClient, HttpDetector, HttpIrrigationClient};
use cwatch_engine::{load_site_config, WatcherConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = WatcherConfig::from_env();

    println!(
        "engine-selfcheck: validating site config at {}",
        config.site_config_path
    );
    let site = load_site_config(&config.site_config_path)?;
    println!(
        "engine-selfcheck: {} cameras ({} enabled), {} zones, dry_run={}",
        site.cameras.len(),
        site.enabled_cameras().count(),
        site.zones.len(),
        site.settings.dry_run
    );

    let camera = HttpCameraClient::from_env()?;
    let detector = HttpDetector::from_env()?;
    let irrigation = HttpIrrigationClient::from_env()?;

    let mut healthy = true;
    for (name, ok) in [
        ("camera service", camera.health_check().await),
        ("inference service", detector.health_check().await),
        ("irrigation controller", irrigation.health_check().await),
    ] {
        println!(
            "engine-selfcheck: {} {}",
            name,
            if ok { "ok" } else { "UNREACHABLE" }
        );
        healthy = healthy && ok;
    }

    if !healthy {
        anyhow::bail!("one or more collaborators are unreachable");
    }

    println!("engine-selfcheck: ok");
    Ok(())
}
