//! Monitored zones and their normalized detection areas.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ZoneError {
    #[error("zone name is empty")]
    EmptyName,
    #[error("camera id is empty")]
    EmptyCameraId,
    #[error("no sprinkler targets configured")]
    NoTargets,
    #[error("detection area is not a valid normalized rectangle")]
    InvalidArea,
}

/// A rectangle in normalized coordinates (0.0 to 1.0), resolution-independent.
///
/// Corner form: `x_min/y_min` is the top-left, `x_max/y_max` the bottom-right.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NormalizedRect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl NormalizedRect {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// Check coordinates are ordered and in range (small epsilon for
    /// float rounding at the far edge).
    pub fn is_valid(&self) -> bool {
        self.x_min >= 0.0
            && self.y_min >= 0.0
            && self.x_max <= 1.001
            && self.y_max <= 1.001
            && self.x_min < self.x_max
            && self.y_min < self.y_max
    }

    /// Containment in normalized space, inclusive at all edges.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }

    /// Resolve to pixel coordinates for a frame of the given dimensions.
    pub fn to_pixels(&self, width: u32, height: u32) -> PixelRect {
        PixelRect {
            x_min: self.x_min * width as f64,
            y_min: self.y_min * height as f64,
            x_max: self.x_max * width as f64,
            y_max: self.y_max * height as f64,
        }
    }
}

/// A rectangle resolved to pixel coordinates at map time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl PixelRect {
    /// Containment check, inclusive at all edges.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}

/// A monitored zone: a named region of one camera's view wired to a set of
/// sprinkler valves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Zone {
    /// Unique zone name, also the key for confirmation and cooldown state
    pub name: String,
    /// Camera whose frames this zone is evaluated against
    pub camera_id: String,
    /// Region of the frame belonging to this zone, normalized
    pub detection_area: NormalizedRect,
    /// Valve ids to activate when the zone triggers
    pub sprinkler_targets: Vec<u32>,
}

impl Zone {
    pub fn validate(&self) -> Result<(), ZoneError> {
        if self.name.trim().is_empty() {
            return Err(ZoneError::EmptyName);
        }
        if self.camera_id.trim().is_empty() {
            return Err(ZoneError::EmptyCameraId);
        }
        if self.sprinkler_targets.is_empty() {
            return Err(ZoneError::NoTargets);
        }
        if !self.detection_area.is_valid() {
            return Err(ZoneError::InvalidArea);
        }
        Ok(())
    }
}
