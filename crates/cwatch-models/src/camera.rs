//! Camera configuration and snapshot data.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A camera the watcher polls for snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CameraConfig {
    /// Camera name as known to the snapshot service
    pub name: String,
    /// Disabled cameras are skipped by the polling loop
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// A single still frame fetched from a camera.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Encoded image bytes, typically JPEG
    pub bytes: Vec<u8>,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Fetch time (cameras here do not report capture time themselves)
    pub captured_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(bytes: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            bytes,
            width,
            height,
            captured_at: Utc::now(),
        }
    }
}
