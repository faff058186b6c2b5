//! Detection types produced by the post-processing pipeline.

use serde::{Deserialize, Serialize};

/// Class labels for the wildlife model, indexed by class id.
pub const ANIMAL_CLASSES: &[&str] = &[
    "deer",
    "rabbit",
    "squirrel",
    "raccoon",
    "cat",
    "dog",
    "fox",
    "skunk",
    "groundhog",
    "opossum",
    "coyote",
    "bird",
];

/// A single detected animal in image-space pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Left edge x-coordinate
    pub x1: f32,
    /// Top edge y-coordinate
    pub y1: f32,
    /// Right edge x-coordinate
    pub x2: f32,
    /// Bottom edge y-coordinate
    pub y2: f32,
    /// Model confidence (0.0 to 1.0)
    pub confidence: f32,
    /// Model class index
    pub class_id: u32,
}

impl Detection {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32, class_id: u32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            confidence,
            class_id,
        }
    }

    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Center point of the box, used for zone containment checks.
    pub fn center(&self) -> (f32, f32) {
        ((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Intersection over union with another box.
    pub fn iou(&self, other: &Detection) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        let union = self.area() + other.area() - intersection;

        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }

    /// Human-readable label for the class index.
    pub fn class_label(&self) -> &'static str {
        ANIMAL_CLASSES
            .get(self.class_id as usize)
            .copied()
            .unwrap_or("unknown")
    }
}
