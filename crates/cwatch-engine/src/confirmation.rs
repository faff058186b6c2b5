//! Sliding-window presence confirmation.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};

/// Outcome of recording a detection event for a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationState {
    /// Fewer corroborating events than required so far
    Accumulating,
    /// Enough events inside the window; the presence is treated as real
    Confirmed,
}

/// Per-zone sliding-window event counter.
///
/// A zone confirms when `required` detection events land within `window`
/// of each other. Confirming does not clear the queue: a persistent animal
/// keeps the zone confirmed across repeated actuation and cooldown cycles
/// until its detections age out.
#[derive(Debug, Default)]
pub struct ConfirmationTracker {
    events: HashMap<String, VecDeque<DateTime<Utc>>>,
}

impl ConfirmationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one detection event at `now` and report the zone's state.
    ///
    /// Events older than the window are pruned first, so after this call
    /// the queue holds only in-window timestamps.
    pub fn record_and_check(
        &mut self,
        zone: &str,
        now: DateTime<Utc>,
        window: Duration,
        required: usize,
    ) -> ConfirmationState {
        let queue = self.events.entry(zone.to_string()).or_default();
        queue.push_back(now);
        queue.retain(|t| now.signed_duration_since(*t) <= window);

        if queue.len() >= required {
            ConfirmationState::Confirmed
        } else {
            ConfirmationState::Accumulating
        }
    }

    /// In-window events currently recorded for a zone.
    pub fn observed(&self, zone: &str) -> usize {
        self.events.get(zone).map_or(0, VecDeque::len)
    }
}
