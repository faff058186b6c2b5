//! Engine error types.

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("site config error: {0}")]
    Site(#[from] cwatch_models::SiteError),

    #[error("detection error: {0}")]
    Detect(#[from] cwatch_detect::DetectError),

    #[error("client error: {0}")]
    Client(#[from] cwatch_clients::ClientError),

    #[error("operation timed out after {0}s")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn timeout(secs: u64) -> Self {
        Self::Timeout(secs)
    }
}
