//! Per-zone actuation cooldown.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

/// Tracks the last successful actuation time per zone.
///
/// Only successful dispatches are recorded; a failed dispatch leaves the
/// zone free to retry on its next confirmed cycle.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    last_activated: HashMap<String, DateTime<Utc>>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the zone is clear of its cooldown. Read-only.
    pub fn can_activate(&self, zone: &str, now: DateTime<Utc>, cooldown: Duration) -> bool {
        match self.last_activated.get(zone) {
            None => true,
            Some(last) => now.signed_duration_since(*last) >= cooldown,
        }
    }

    /// Seconds until the zone may activate again, zero when clear.
    pub fn remaining_secs(&self, zone: &str, now: DateTime<Utc>, cooldown: Duration) -> i64 {
        match self.last_activated.get(zone) {
            None => 0,
            Some(last) => (cooldown - now.signed_duration_since(*last))
                .num_seconds()
                .max(0),
        }
    }

    /// Record a successful actuation.
    pub fn mark_activated(&mut self, zone: &str, now: DateTime<Utc>) {
        self.last_activated.insert(zone.to_string(), now);
    }

    pub fn last_activated(&self, zone: &str) -> Option<DateTime<Utc>> {
        self.last_activated.get(zone).copied()
    }
}
