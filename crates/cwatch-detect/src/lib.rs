//! Detection post-processing for the CritterWatch backend.
//!
//! Turns a wildlife model's raw output into clean image-space bounding
//! boxes: confidence filtering, greedy non-maximum suppression, mapping
//! back to the original frame, and clamping. The forward pass itself runs
//! behind the [`Detector`] trait so local runtimes and remote inference
//! services are interchangeable.

pub mod detector;
pub mod error;
pub mod mapping;
pub mod postprocess;
pub mod raw;

pub use detector::Detector;
pub use error::{DetectError, DetectResult};
pub use mapping::FrameMapping;
pub use postprocess::{PostprocessConfig, Postprocessor};
pub use raw::{RawCandidate, RawOutput};
