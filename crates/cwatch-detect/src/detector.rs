//! Detector collaborator trait.

use async_trait::async_trait;
use cwatch_models::Snapshot;

use crate::error::DetectResult;
use crate::raw::RawOutput;

/// Wildlife detection model collaborator.
///
/// The engine only interprets raw output rows; the forward pass itself
/// (local runtime or remote inference service) lives behind this trait.
#[async_trait]
pub trait Detector: Send + Sync {
    /// Run a single forward pass over a snapshot.
    async fn infer(&self, snapshot: &Snapshot) -> DetectResult<RawOutput>;

    /// Backend name for logging.
    fn name(&self) -> &'static str;
}
