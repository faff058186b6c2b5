//! Watcher daemon configuration.

use std::time::Duration;

/// Configuration for the watcher daemon, loaded from the environment.
#[derive(Debug, Clone)]
pub struct WatcherConfig {
    /// Delay between polling cycles
    pub poll_interval: Duration,
    /// Maximum camera cycles run in parallel
    pub max_camera_parallel: usize,
    /// Per-call budget for snapshot fetches
    pub snapshot_timeout: Duration,
    /// Per-call budget for model inference
    pub inference_timeout: Duration,
    /// Per-call budget for irrigation dispatch
    pub actuation_timeout: Duration,
    /// Path to the site configuration file
    pub site_config_path: String,
    /// Model input width in pixels
    pub model_input_width: u32,
    /// Model input height in pixels
    pub model_input_height: u32,
    /// Whether snapshot preprocessing letterboxes instead of stretching
    pub model_letterbox: bool,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            max_camera_parallel: 4,
            snapshot_timeout: Duration::from_secs(15),
            inference_timeout: Duration::from_secs(30),
            actuation_timeout: Duration::from_secs(15),
            site_config_path: "config/site.json".to_string(),
            model_input_width: 640,
            model_input_height: 640,
            model_letterbox: false,
        }
    }
}

impl WatcherConfig {
    pub fn from_env() -> Self {
        Self {
            poll_interval: Duration::from_secs(
                std::env::var("CWATCH_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
            ),
            max_camera_parallel: std::env::var("CWATCH_MAX_CAMERA_PARALLEL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(4),
            snapshot_timeout: Duration::from_secs(
                std::env::var("CWATCH_SNAPSHOT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(15),
            ),
            inference_timeout: Duration::from_secs(
                std::env::var("CWATCH_INFERENCE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            actuation_timeout: Duration::from_secs(
                std::env::var("CWATCH_ACTUATION_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(15),
            ),
            site_config_path: std::env::var("CWATCH_SITE_CONFIG")
                .unwrap_or_else(|_| "config/site.json".to_string()),
            model_input_width: std::env::var("CWATCH_MODEL_INPUT_WIDTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(640),
            model_input_height: std::env::var("CWATCH_MODEL_INPUT_HEIGHT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(640),
            model_letterbox: std::env::var("CWATCH_MODEL_LETTERBOX")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}
