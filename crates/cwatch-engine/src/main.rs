//! CritterWatch watcher daemon.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cwatch_clients::{HttpCameraClient, HttpDetector, HttpIrrigationClient};
use cwatch_engine::{load_site_config, DecisionEngine, SettingsStore, Watcher, WatcherConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Install default crypto provider for rustls
    let _ = rustls::crypto::ring::default_provider().install_default();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cwatch_engine=info"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true))
            .with(env_filter)
            .init();
    }

    info!("Starting cwatch-engine");

    let config = WatcherConfig::from_env();
    info!("Watcher config: {:?}", config);

    cwatch_engine::metrics::maybe_init_exporter();

    // Site configuration must be valid before the loop starts
    let site = match load_site_config(&config.site_config_path) {
        Ok(site) => site,
        Err(e) => {
            error!("Invalid site configuration: {}", e);
            std::process::exit(1);
        }
    };

    let camera_client = match HttpCameraClient::from_env() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to build camera client: {}", e);
            std::process::exit(1);
        }
    };
    let detector = match HttpDetector::from_env() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to build inference client: {}", e);
            std::process::exit(1);
        }
    };
    let irrigation = match HttpIrrigationClient::from_env() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to build irrigation client: {}", e);
            std::process::exit(1);
        }
    };

    let settings = SettingsStore::new(site.settings.clone());
    let engine = Arc::new(DecisionEngine::new(
        config.clone(),
        settings,
        site.zones.clone(),
        camera_client,
        detector,
        irrigation,
    ));

    let cameras: Vec<_> = site.enabled_cameras().cloned().collect();
    if cameras.is_empty() {
        error!("All configured cameras are disabled, nothing to watch");
        std::process::exit(1);
    }

    let watcher = Arc::new(Watcher::new(
        engine,
        cameras,
        config.poll_interval,
        config.max_camera_parallel,
    ));

    // Graceful shutdown on ctrl-c
    let shutdown_watcher = Arc::clone(&watcher);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal");
            shutdown_watcher.shutdown();
        }
    });

    watcher.run().await;

    info!("Watcher shutdown complete");
}
