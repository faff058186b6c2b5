//! Camera snapshot client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use image::GenericImageView;
use reqwest::Client;
use tracing::{debug, warn};

use cwatch_models::Snapshot;

use crate::error::{ClientError, ClientResult};

/// Snapshot source collaborator.
#[async_trait]
pub trait CameraClient: Send + Sync {
    /// Fetch the most recent still frame for a named camera.
    async fn get_snapshot(&self, camera: &str) -> ClientResult<Snapshot>;
}

/// Configuration for the HTTP camera client.
#[derive(Debug, Clone)]
pub struct CameraClientConfig {
    /// Base URL of the snapshot service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for CameraClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

impl CameraClientConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("CAMERA_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            timeout: Duration::from_secs(
                std::env::var("CAMERA_SERVICE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(15),
            ),
        }
    }
}

/// Camera client for any bridge that serves stills over HTTP.
///
/// Fetches `GET {base}/cameras/{name}/snapshot` and expects an encoded
/// image body. Frame dimensions are probed from the image header since the
/// decision pipeline needs them for coordinate mapping.
pub struct HttpCameraClient {
    http: Client,
    config: CameraClientConfig,
}

impl HttpCameraClient {
    pub fn new(config: CameraClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Network)?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> ClientResult<Self> {
        Self::new(CameraClientConfig::from_env())
    }

    /// Probe the service health endpoint.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.config.base_url);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Camera service health check failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl CameraClient for HttpCameraClient {
    async fn get_snapshot(&self, camera: &str) -> ClientResult<Snapshot> {
        let url = format!("{}/cameras/{}/snapshot", self.config.base_url, camera);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return Err(ClientError::unavailable(format!(
                "snapshot service returned {} for camera {}",
                status, camera
            )));
        }
        if !status.is_success() {
            return Err(ClientError::request_failed(format!(
                "snapshot service returned {} for camera {}",
                status, camera
            )));
        }

        let bytes = response.bytes().await?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|e| ClientError::DecodeFailed(format!("camera {}: {}", camera, e)))?;
        let (width, height) = decoded.dimensions();

        debug!(camera, width, height, size = bytes.len(), "Fetched snapshot");

        Ok(Snapshot {
            bytes: bytes.to_vec(),
            width,
            height,
            captured_at: Utc::now(),
        })
    }
}
