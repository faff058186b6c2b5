//! Shared data models for the CritterWatch backend.
//!
//! This crate provides the Serde-serializable types used across the
//! detection and actuation pipeline:
//! - Detections and bounding boxes
//! - Monitored zones and normalized rectangles
//! - Camera configuration and snapshots
//! - Season and active-hours calendar windows
//! - Deterrence settings and the site configuration

pub mod camera;
pub mod detection;
pub mod schedule;
pub mod settings;
pub mod site;
pub mod zone;

pub use camera::{CameraConfig, Snapshot};
pub use detection::{Detection, ANIMAL_CLASSES};
pub use schedule::{ActiveHours, MonthDay, ScheduleError, SeasonWindow};
pub use settings::{DeterrenceSettings, SettingsError};
pub use site::{SiteConfig, SiteError};
pub use zone::{NormalizedRect, PixelRect, Zone, ZoneError};
