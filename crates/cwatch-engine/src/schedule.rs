//! Season and active-hours gating.
//!
//! Rejection here is a routine outcome, not an error: off-season and
//! daytime suppression are how overnight-only deployments are expected to
//! spend most of their cycles. Gating never touches confirmation state.

use chrono::{Datelike, NaiveDateTime, Timelike};

use cwatch_models::{ActiveHours, DeterrenceSettings, MonthDay, SeasonWindow};

/// Why the schedule gate passed or suppressed a confirmed zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleDecision {
    /// Both calendar checks passed
    Permitted,
    /// The date falls outside the configured season
    OutOfSeason,
    /// The hour falls outside the configured active hours
    OutsideActiveHours,
}

/// Whether a local date falls inside the season window.
pub fn in_season(season: &SeasonWindow, date: chrono::NaiveDate) -> bool {
    season.contains(MonthDay {
        month: date.month(),
        day: date.day(),
    })
}

/// Whether a local hour falls inside the active hours.
pub fn in_active_hours(hours: &ActiveHours, hour: u32) -> bool {
    hours.contains_hour(hour)
}

/// Evaluate both calendar checks for a local wall-clock timestamp.
/// Season is checked first.
pub fn gate(settings: &DeterrenceSettings, local_now: NaiveDateTime) -> ScheduleDecision {
    if !in_season(&settings.season(), local_now.date()) {
        return ScheduleDecision::OutOfSeason;
    }
    if !in_active_hours(&settings.active_hours(), local_now.hour()) {
        return ScheduleDecision::OutsideActiveHours;
    }
    ScheduleDecision::Permitted
}
