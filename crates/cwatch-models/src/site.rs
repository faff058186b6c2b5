//! Site configuration: cameras, zones, and initial settings.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::CameraConfig;
use crate::settings::{DeterrenceSettings, SettingsError};
use crate::zone::{Zone, ZoneError};

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("no cameras configured")]
    NoCameras,
    #[error("duplicate camera name '{0}'")]
    DuplicateCamera(String),
    #[error("duplicate zone name '{0}'")]
    DuplicateZone(String),
    #[error("zone '{zone}' references unknown camera '{camera_id}'")]
    UnknownCamera { zone: String, camera_id: String },
    #[error("zone '{zone}': {source}")]
    Zone { zone: String, source: ZoneError },
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Everything a deployment needs, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub cameras: Vec<CameraConfig>,
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub settings: DeterrenceSettings,
}

impl SiteConfig {
    /// Validate the whole configuration. Any error here should abort
    /// startup rather than surface later inside the polling loop.
    pub fn validate(&self) -> Result<(), SiteError> {
        if self.cameras.is_empty() {
            return Err(SiteError::NoCameras);
        }

        let mut camera_names = HashSet::new();
        for camera in &self.cameras {
            if !camera_names.insert(camera.name.as_str()) {
                return Err(SiteError::DuplicateCamera(camera.name.clone()));
            }
        }

        let mut zone_names = HashSet::new();
        for zone in &self.zones {
            zone.validate().map_err(|source| SiteError::Zone {
                zone: zone.name.clone(),
                source,
            })?;
            if !zone_names.insert(zone.name.as_str()) {
                return Err(SiteError::DuplicateZone(zone.name.clone()));
            }
            if !camera_names.contains(zone.camera_id.as_str()) {
                return Err(SiteError::UnknownCamera {
                    zone: zone.name.clone(),
                    camera_id: zone.camera_id.clone(),
                });
            }
        }

        self.settings.validate()?;
        Ok(())
    }

    /// Cameras the polling loop should actually visit.
    pub fn enabled_cameras(&self) -> impl Iterator<Item = &CameraConfig> {
        self.cameras.iter().filter(|c| c.enabled)
    }
}
