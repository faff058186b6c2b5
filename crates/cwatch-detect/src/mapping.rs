//! Coordinate mapping from model-input space back to the original frame.
//!
//! Two preprocessing conventions are covered: a plain stretch-resize with
//! independent x/y scale factors, and aspect-preserving letterboxing with a
//! shared scale and centered padding. Mapped points are clamped to the
//! frame so boxes never land outside the image.

/// Mapping from model-input pixel coordinates to original-image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMapping {
    orig_width: f32,
    orig_height: f32,
    scale_x: f32,
    scale_y: f32,
    pad_x: f32,
    pad_y: f32,
}

impl FrameMapping {
    /// Mapping for preprocessing that stretches the frame to the input
    /// size. Scale factors are independent per axis.
    pub fn resize(orig_w: u32, orig_h: u32, input_w: u32, input_h: u32) -> Self {
        Self {
            orig_width: orig_w as f32,
            orig_height: orig_h as f32,
            scale_x: orig_w as f32 / input_w as f32,
            scale_y: orig_h as f32 / input_h as f32,
            pad_x: 0.0,
            pad_y: 0.0,
        }
    }

    /// Mapping for letterboxed preprocessing: the frame is scaled by one
    /// factor and centered on the input canvas, so the padding offsets are
    /// removed before scaling back.
    pub fn letterbox(orig_w: u32, orig_h: u32, input_w: u32, input_h: u32) -> Self {
        let scale = (input_w as f32 / orig_w as f32).min(input_h as f32 / orig_h as f32);
        let scaled_w = (orig_w as f32 * scale).round();
        let scaled_h = (orig_h as f32 * scale).round();
        let pad_x = ((input_w as f32 - scaled_w) / 2.0).floor();
        let pad_y = ((input_h as f32 - scaled_h) / 2.0).floor();

        Self {
            orig_width: orig_w as f32,
            orig_height: orig_h as f32,
            scale_x: 1.0 / scale,
            scale_y: 1.0 / scale,
            pad_x,
            pad_y,
        }
    }

    /// Map one input-space point to image space, clamped to the frame.
    pub fn to_image(&self, x: f32, y: f32) -> (f32, f32) {
        let ix = (x - self.pad_x) * self.scale_x;
        let iy = (y - self.pad_y) * self.scale_y;
        (
            ix.clamp(0.0, self.orig_width),
            iy.clamp(0.0, self.orig_height),
        )
    }

    pub fn orig_width(&self) -> f32 {
        self.orig_width
    }

    pub fn orig_height(&self) -> f32 {
        self.orig_height
    }
}
