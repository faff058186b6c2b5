//! Detection-to-zone assignment.

use std::collections::HashMap;

use cwatch_models::{Detection, Zone};

/// Assign detections to zones by center-point containment.
///
/// Zone rectangles are stored normalized and resolved against the actual
/// frame dimensions here, since snapshot resolution varies by camera. A
/// detection whose center sits in several overlapping zones counts for all
/// of them. Zones with no detections are absent from the result, so
/// callers can tell "nothing seen" from "zone not evaluated".
pub fn map_to_zones(
    detections: &[Detection],
    zones: &[Zone],
    frame_width: u32,
    frame_height: u32,
) -> HashMap<String, Vec<Detection>> {
    let mut mapped: HashMap<String, Vec<Detection>> = HashMap::new();

    for zone in zones {
        let area = zone.detection_area.to_pixels(frame_width, frame_height);
        let hits: Vec<Detection> = detections
            .iter()
            .filter(|det| {
                let (cx, cy) = det.center();
                area.contains(cx as f64, cy as f64)
            })
            .copied()
            .collect();

        if !hits.is_empty() {
            mapped.insert(zone.name.clone(), hits);
        }
    }

    mapped
}
