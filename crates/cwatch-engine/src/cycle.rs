//! Per-cycle decision outcomes.

use serde::Serialize;

/// What the engine decided for one zone in one polling cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ZoneOutcome {
    /// Detections recorded but the confirmation bar is not met yet
    Accumulating { observed: usize, required: usize },
    /// Confirmed, but the date is outside the season window
    OutOfSeason,
    /// Confirmed, but the hour is outside active hours
    OutsideActiveHours,
    /// Confirmed, but the zone is still cooling down
    CoolingDown { remaining_secs: i64 },
    /// Every gate passed; dry-run mode suppressed the dispatch
    WouldActivate,
    /// Sprinklers were activated
    Activated,
    /// Every gate passed but the controller call failed
    ActivationFailed,
}

/// Report for one camera's polling cycle. Zones appear in configuration
/// order; zones with no detections this cycle are omitted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CycleReport {
    pub camera: String,
    /// Whether a snapshot was obtained
    pub snapshot_ok: bool,
    /// Whether the detector produced a usable result
    pub detector_ok: bool,
    /// Detections surviving post-processing
    pub detections: usize,
    /// Per-zone decisions
    pub zones: Vec<(String, ZoneOutcome)>,
}

impl CycleReport {
    pub fn outcome_for(&self, zone: &str) -> Option<&ZoneOutcome> {
        self.zones
            .iter()
            .find(|(name, _)| name == zone)
            .map(|(_, outcome)| outcome)
    }

    /// Zones actually dispatched this cycle.
    pub fn activated(&self) -> impl Iterator<Item = &str> {
        self.zones.iter().filter_map(|(name, outcome)| {
            matches!(outcome, ZoneOutcome::Activated).then_some(name.as_str())
        })
    }
}
