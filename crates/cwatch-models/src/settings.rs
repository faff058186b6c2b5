//! Runtime deterrence settings.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schedule::{ActiveHours, MonthDay, ScheduleError, SeasonWindow};

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("confidence_threshold {0} outside 0.0-1.0")]
    InvalidConfidenceThreshold(f32),
    #[error("iou_threshold {0} outside 0.0-1.0")]
    InvalidIouThreshold(f32),
    #[error("required_detections must be at least 1")]
    ZeroRequiredDetections,
    #[error("actuation_duration_seconds must be at least 1")]
    ZeroActuationDuration,
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Deterrence settings consumed by every stage of the decision pipeline.
///
/// Settings can be replaced at runtime as a whole; each polling cycle reads
/// one consistent snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeterrenceSettings {
    /// Minimum model confidence for a detection to count
    pub confidence_threshold: f32,
    /// IoU threshold above which overlapping boxes are deduplicated
    pub iou_threshold: f32,
    /// Detections required inside the window before a zone is confirmed
    pub required_detections: usize,
    /// Length of the sliding confirmation window
    pub confirmation_window_seconds: u64,
    /// First day of the active season, written MM-DD
    pub season_start: MonthDay,
    /// Last day of the active season, inclusive
    pub season_end: MonthDay,
    /// Whether the time-of-day restriction applies at all
    pub active_hours_enabled: bool,
    /// First active hour of day (0-23)
    pub active_hours_start_hour: u32,
    /// Last active hour of day (0-23), inclusive
    pub active_hours_end_hour: u32,
    /// Sprinkler run time per activation
    pub actuation_duration_seconds: u32,
    /// Minimum gap between activations of the same zone
    pub zone_cooldown_seconds: u64,
    /// Evaluate and log every decision but never dispatch
    pub dry_run: bool,
}

impl Default for DeterrenceSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            iou_threshold: 0.45,
            required_detections: 3,
            confirmation_window_seconds: 60,
            // Watering season defaults; sprinkler lines are typically
            // drained outside these months
            season_start: MonthDay { month: 4, day: 1 },
            season_end: MonthDay { month: 10, day: 31 },
            active_hours_enabled: false,
            active_hours_start_hour: 20,
            active_hours_end_hour: 6,
            actuation_duration_seconds: 10,
            zone_cooldown_seconds: 300,
            dry_run: false,
        }
    }
}

impl DeterrenceSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(SettingsError::InvalidConfidenceThreshold(
                self.confidence_threshold,
            ));
        }
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(SettingsError::InvalidIouThreshold(self.iou_threshold));
        }
        if self.required_detections == 0 {
            return Err(SettingsError::ZeroRequiredDetections);
        }
        if self.actuation_duration_seconds == 0 {
            return Err(SettingsError::ZeroActuationDuration);
        }
        // Re-check bounds in case the struct was built directly rather
        // than parsed
        MonthDay::new(self.season_start.month, self.season_start.day)?;
        MonthDay::new(self.season_end.month, self.season_end.day)?;
        self.active_hours().validate()?;
        Ok(())
    }

    /// Typed view of the season bounds.
    pub fn season(&self) -> SeasonWindow {
        SeasonWindow::new(self.season_start, self.season_end)
    }

    /// Typed view of the active-hours bounds.
    pub fn active_hours(&self) -> ActiveHours {
        ActiveHours {
            enabled: self.active_hours_enabled,
            start_hour: self.active_hours_start_hour,
            end_hour: self.active_hours_end_hour,
        }
    }

    pub fn confirmation_window(&self) -> Duration {
        Duration::seconds(self.confirmation_window_seconds as i64)
    }

    pub fn zone_cooldown(&self) -> Duration {
        Duration::seconds(self.zone_cooldown_seconds as i64)
    }
}
