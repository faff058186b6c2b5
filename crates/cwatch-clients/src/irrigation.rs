//! Irrigation controller client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Sprinkler actuation collaborator.
#[async_trait]
pub trait IrrigationClient: Send + Sync {
    /// Request activation of the given valve ids for the given run time.
    ///
    /// Success means the controller accepted the command as a whole; there
    /// are no partial-success semantics.
    async fn activate(&self, targets: &[u32], duration_secs: u32) -> ClientResult<()>;
}

/// Configuration for the HTTP irrigation client.
#[derive(Debug, Clone)]
pub struct IrrigationClientConfig {
    /// Base URL of the irrigation controller
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for IrrigationClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8090".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

impl IrrigationClientConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("IRRIGATION_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8090".to_string()),
            timeout: Duration::from_secs(
                std::env::var("IRRIGATION_SERVICE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(15),
            ),
        }
    }
}

#[derive(Debug, Serialize)]
struct ActivateRequest<'a> {
    targets: &'a [u32],
    duration_seconds: u32,
}

#[derive(Debug, Deserialize)]
struct ActivateResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// HTTP irrigation client.
///
/// Posts `{targets, duration_seconds}` to `{base}/activate`. Simple relay
/// controllers answer 2xx with an empty body; richer ones return
/// `{"success": ..., "message": ...}`.
pub struct HttpIrrigationClient {
    http: Client,
    config: IrrigationClientConfig,
}

impl HttpIrrigationClient {
    pub fn new(config: IrrigationClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Network)?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> ClientResult<Self> {
        Self::new(IrrigationClientConfig::from_env())
    }

    /// Probe the controller health endpoint.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.config.base_url);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Irrigation controller health check failed: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl IrrigationClient for HttpIrrigationClient {
    async fn activate(&self, targets: &[u32], duration_secs: u32) -> ClientResult<()> {
        let url = format!("{}/activate", self.config.base_url);
        let request = ActivateRequest {
            targets,
            duration_seconds: duration_secs,
        };

        let response = self.http.post(&url).json(&request).send().await?;

        let status = response.status();
        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return Err(ClientError::unavailable(format!(
                "irrigation controller returned {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(ClientError::request_failed(format!(
                "irrigation controller returned {}",
                status
            )));
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            debug!(targets = ?targets, duration_secs, "Activation accepted");
            return Ok(());
        }

        let parsed: ActivateResponse = serde_json::from_slice(&body)
            .map_err(|e| ClientError::invalid_response(format!("activation response: {}", e)))?;
        if !parsed.success {
            return Err(ClientError::request_failed(format!(
                "controller rejected activation: {}",
                parsed.message.unwrap_or_else(|| "no reason given".to_string())
            )));
        }

        debug!(targets = ?targets, duration_secs, "Activation accepted");
        Ok(())
    }
}
