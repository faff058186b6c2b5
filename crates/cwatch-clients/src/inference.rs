//! Remote inference client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use cwatch_detect::{DetectError, DetectResult, Detector, RawOutput};
use cwatch_models::Snapshot;

/// Configuration for the inference client.
#[derive(Debug, Clone)]
pub struct InferenceClientConfig {
    /// Base URL of the inference service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for InferenceClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl InferenceClientConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("INFERENCE_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            timeout: Duration::from_secs(
                std::env::var("INFERENCE_SERVICE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
struct InferenceResponse {
    /// One row per candidate box, all rows the same width
    outputs: Vec<Vec<f32>>,
}

/// Detector backed by a remote inference service.
///
/// Posts the encoded snapshot as multipart and receives raw candidate
/// rows; interpreting the rows stays in `cwatch-detect`. A refused
/// connection or a 503 surfaces as `ModelUnavailable` so the decision loop
/// can degrade to zero detections.
pub struct HttpDetector {
    http: Client,
    config: InferenceClientConfig,
}

impl HttpDetector {
    pub fn new(config: InferenceClientConfig) -> DetectResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DetectError::inference_failed(format!("HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    pub fn from_env() -> DetectResult<Self> {
        Self::new(InferenceClientConfig::from_env())
    }

    /// Probe the service health endpoint.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/health", self.config.base_url);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!("Inference service health check failed: {}", e);
                false
            }
        }
    }

    fn rows_to_output(rows: Vec<Vec<f32>>) -> DetectResult<RawOutput> {
        if rows.is_empty() {
            return Ok(RawOutput::empty());
        }

        let row_len = rows[0].len();
        let mut flat = Vec::with_capacity(rows.len() * row_len);
        for row in &rows {
            if row.len() != row_len {
                return Err(DetectError::decode_failed(format!(
                    "ragged output rows: {} and {}",
                    row_len,
                    row.len()
                )));
            }
            flat.extend_from_slice(row);
        }

        RawOutput::new(flat, row_len)
    }
}

#[async_trait]
impl Detector for HttpDetector {
    async fn infer(&self, snapshot: &Snapshot) -> DetectResult<RawOutput> {
        let url = format!("{}/infer", self.config.base_url);

        let part = Part::bytes(snapshot.bytes.clone())
            .file_name("snapshot.jpg")
            .mime_str("application/octet-stream")
            .map_err(|e| DetectError::invalid_input(format!("snapshot part: {}", e)))?;
        let form = Form::new().part("image", part);

        let response = self.http.post(&url).multipart(form).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                DetectError::model_unavailable(e.to_string())
            } else {
                DetectError::inference_failed(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(DetectError::model_unavailable(format!(
                "inference service returned {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(DetectError::inference_failed(format!(
                "inference service returned {}",
                status
            )));
        }

        let parsed: InferenceResponse = response
            .json()
            .await
            .map_err(|e| DetectError::decode_failed(e.to_string()))?;

        let raw = Self::rows_to_output(parsed.outputs)?;
        debug!(candidates = raw.len(), "Inference response decoded");
        Ok(raw)
    }

    fn name(&self) -> &'static str {
        "http-inference"
    }
}
