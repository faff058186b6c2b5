//! Inference post-processing: confidence filter, NMS, rescale, clamp.
//!
//! One raw output in, a deduplicated list of image-space detections out.
//! An empty result is a normal outcome, not an error.

use std::cmp::Ordering;

use cwatch_models::Detection;
use tracing::debug;

use crate::mapping::FrameMapping;
use crate::raw::{RawCandidate, RawOutput};

/// Post-processing parameters for one inference pass.
#[derive(Debug, Clone)]
pub struct PostprocessConfig {
    /// Rows below this confidence are dropped
    pub confidence_threshold: f32,
    /// Overlap above this IoU suppresses the lower-confidence box
    pub iou_threshold: f32,
    /// Model input width in pixels
    pub input_width: u32,
    /// Model input height in pixels
    pub input_height: u32,
    /// Whether preprocessing letterboxes instead of stretching
    pub letterbox: bool,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.25,
            iou_threshold: 0.45,
            input_width: 640,
            input_height: 640,
            letterbox: false,
        }
    }
}

/// Runs the post-processing pipeline for one raw model output.
pub struct Postprocessor {
    config: PostprocessConfig,
}

impl Postprocessor {
    pub fn new(config: PostprocessConfig) -> Self {
        Self { config }
    }

    /// Filter, suppress, and map one raw output onto a frame of the given
    /// original dimensions.
    pub fn run(&self, raw: &RawOutput, orig_width: u32, orig_height: u32) -> Vec<Detection> {
        let mut survivors: Vec<RawCandidate> = raw
            .candidates()
            .filter(|c| c.confidence >= self.config.confidence_threshold)
            .collect();

        // Stable sort keeps first-encountered order for equal confidences,
        // so suppression ties resolve deterministically
        survivors.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(Ordering::Equal)
        });

        let kept = non_maximum_suppression(survivors, self.config.iou_threshold);

        let mapping = self.mapping(orig_width, orig_height);
        let detections: Vec<Detection> = kept
            .into_iter()
            .map(|c| {
                let (x1, y1) = mapping.to_image(c.x1, c.y1);
                let (x2, y2) = mapping.to_image(c.x2, c.y2);
                Detection::new(x1, y1, x2, y2, c.confidence, c.class_id)
            })
            .collect();

        debug!(
            candidates = raw.len(),
            detections = detections.len(),
            "Post-processing complete"
        );

        detections
    }

    fn mapping(&self, orig_width: u32, orig_height: u32) -> FrameMapping {
        if self.config.letterbox {
            FrameMapping::letterbox(
                orig_width,
                orig_height,
                self.config.input_width,
                self.config.input_height,
            )
        } else {
            FrameMapping::resize(
                orig_width,
                orig_height,
                self.config.input_width,
                self.config.input_height,
            )
        }
    }
}

/// Greedy class-agnostic NMS over candidates sorted by descending
/// confidence. Overlapping animals of different classes are still the same
/// sprinkler decision, so cross-class duplicates are suppressed too.
fn non_maximum_suppression(candidates: Vec<RawCandidate>, iou_threshold: f32) -> Vec<RawCandidate> {
    if candidates.is_empty() {
        return candidates;
    }

    let mut keep = Vec::new();
    let mut suppressed = vec![false; candidates.len()];

    for i in 0..candidates.len() {
        if suppressed[i] {
            continue;
        }
        keep.push(candidates[i]);

        for j in (i + 1)..candidates.len() {
            if suppressed[j] {
                continue;
            }
            if iou(&candidates[i], &candidates[j]) > iou_threshold {
                suppressed[j] = true;
            }
        }
    }

    keep
}

fn iou(a: &RawCandidate, b: &RawCandidate) -> f32 {
    let x1 = a.x1.max(b.x1);
    let y1 = a.y1.max(b.y1);
    let x2 = a.x2.min(b.x2);
    let y2 = a.y2.min(b.y2);

    let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    let area_a = (a.x2 - a.x1).max(0.0) * (a.y2 - a.y1).max(0.0);
    let area_b = (b.x2 - b.x1).max(0.0) * (b.y2 - b.y1).max(0.0);
    let union = area_a + area_b - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}
