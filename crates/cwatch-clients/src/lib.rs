//! HTTP collaborator clients for the CritterWatch engine.
//!
//! Camera snapshots, irrigation actuation, and remote inference each sit
//! behind a trait; the implementations here cover collaborators that speak
//! plain HTTP. Vendor-specific transports belong in their own impls of the
//! same traits.

pub mod camera;
pub mod error;
pub mod inference;
pub mod irrigation;

pub use camera::{CameraClient, CameraClientConfig, HttpCameraClient};
pub use error::{ClientError, ClientResult};
pub use inference::{HttpDetector, InferenceClientConfig};
pub use irrigation::{HttpIrrigationClient, IrrigationClient, IrrigationClientConfig};
