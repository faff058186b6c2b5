//! Season and active-hours calendar types.
//!
//! Both windows support wraparound: a season of `11-01..03-31` spans the
//! year boundary and active hours of `20..6` span midnight. Bounds are
//! inclusive on both ends.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("invalid month-day '{0}', expected MM-DD")]
    InvalidFormat(String),
    #[error("month {0} out of range 1-12")]
    InvalidMonth(u32),
    #[error("day {day} out of range for month {month}")]
    InvalidDay { month: u32, day: u32 },
    #[error("hour {0} out of range 0-23")]
    InvalidHour(u32),
}

const DAYS_IN_MONTH: [u32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// A calendar day of year as a month/day pair, written as `MM-DD`.
///
/// Ordering is lexicographic on (month, day), which matches calendar order
/// within a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    /// Validated constructor. Feb 29 is accepted as a season bound even
    /// though it only occurs in leap years.
    pub fn new(month: u32, day: u32) -> Result<Self, ScheduleError> {
        if !(1..=12).contains(&month) {
            return Err(ScheduleError::InvalidMonth(month));
        }
        if day == 0 || day > DAYS_IN_MONTH[(month - 1) as usize] {
            return Err(ScheduleError::InvalidDay { month, day });
        }
        Ok(Self { month, day })
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

impl FromStr for MonthDay {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (month, day) = s
            .split_once('-')
            .ok_or_else(|| ScheduleError::InvalidFormat(s.to_string()))?;
        let month = month
            .trim()
            .parse()
            .map_err(|_| ScheduleError::InvalidFormat(s.to_string()))?;
        let day = day
            .trim()
            .parse()
            .map_err(|_| ScheduleError::InvalidFormat(s.to_string()))?;
        Self::new(month, day)
    }
}

impl Serialize for MonthDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Seasonal operating window with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonWindow {
    pub start: MonthDay,
    pub end: MonthDay,
}

impl SeasonWindow {
    pub fn new(start: MonthDay, end: MonthDay) -> Self {
        Self { start, end }
    }

    /// Whether the window spans the year boundary.
    pub fn wraps_year(&self) -> bool {
        self.start > self.end
    }

    /// Whether the given calendar day falls inside the window.
    pub fn contains(&self, day: MonthDay) -> bool {
        if self.start > self.end {
            day >= self.start || day <= self.end
        } else {
            day >= self.start && day <= self.end
        }
    }
}

/// Daily active-hours window with inclusive hour bounds.
///
/// When disabled, every hour passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveHours {
    pub enabled: bool,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl ActiveHours {
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.start_hour > 23 {
            return Err(ScheduleError::InvalidHour(self.start_hour));
        }
        if self.end_hour > 23 {
            return Err(ScheduleError::InvalidHour(self.end_hour));
        }
        Ok(())
    }

    /// Whether the given hour of day falls inside the window.
    pub fn contains_hour(&self, hour: u32) -> bool {
        if !self.enabled {
            return true;
        }
        if self.start_hour > self.end_hour {
            hour >= self.start_hour || hour <= self.end_hour
        } else {
            hour >= self.start_hour && hour <= self.end_hour
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md(month: u32, day: u32) -> MonthDay {
        MonthDay::new(month, day).unwrap()
    }

    #[test]
    fn test_month_day_parse() {
        assert_eq!("04-01".parse::<MonthDay>().unwrap(), md(4, 1));
        assert_eq!("11-30".parse::<MonthDay>().unwrap(), md(11, 30));
        assert_eq!("02-29".parse::<MonthDay>().unwrap(), md(2, 29));
    }

    #[test]
    fn test_month_day_parse_rejects_garbage() {
        assert_eq!(
            "0401".parse::<MonthDay>(),
            Err(ScheduleError::InvalidFormat("0401".to_string()))
        );
        assert_eq!(
            "13-01".parse::<MonthDay>(),
            Err(ScheduleError::InvalidMonth(13))
        );
        assert_eq!(
            "02-30".parse::<MonthDay>(),
            Err(ScheduleError::InvalidDay { month: 2, day: 30 })
        );
        assert_eq!(
            "06-00".parse::<MonthDay>(),
            Err(ScheduleError::InvalidDay { month: 6, day: 0 })
        );
        assert!("ab-cd".parse::<MonthDay>().is_err());
    }

    #[test]
    fn test_month_day_display_pads() {
        assert_eq!(md(4, 1).to_string(), "04-01");
        assert_eq!(md(12, 25).to_string(), "12-25");
    }

    #[test]
    fn test_month_day_serde_as_string() {
        let json = serde_json::to_string(&md(11, 1)).unwrap();
        assert_eq!(json, "\"11-01\"");
        let back: MonthDay = serde_json::from_str("\"03-31\"").unwrap();
        assert_eq!(back, md(3, 31));
    }

    #[test]
    fn test_month_day_ordering_is_calendar_order() {
        assert!(md(3, 31) < md(4, 1));
        assert!(md(11, 1) > md(10, 31));
        assert!(md(6, 15) == md(6, 15));
    }

    #[test]
    fn test_season_plain_window() {
        let season = SeasonWindow::new(md(4, 1), md(10, 31));
        assert!(!season.wraps_year());
        assert!(season.contains(md(4, 1)));
        assert!(season.contains(md(7, 15)));
        assert!(season.contains(md(10, 31)));
        assert!(!season.contains(md(3, 31)));
        assert!(!season.contains(md(11, 1)));
    }

    #[test]
    fn test_season_wraps_year_boundary() {
        // Nov 1 through Mar 31 covers the turn of the year
        let season = SeasonWindow::new(md(11, 1), md(3, 31));
        assert!(season.wraps_year());
        assert!(season.contains(md(1, 16)));
        assert!(season.contains(md(11, 1)));
        assert!(season.contains(md(12, 25)));
        assert!(season.contains(md(3, 31)));
        assert!(!season.contains(md(6, 1)));
        assert!(!season.contains(md(4, 1)));
        assert!(!season.contains(md(10, 31)));
    }

    #[test]
    fn test_season_single_day() {
        let season = SeasonWindow::new(md(6, 15), md(6, 15));
        assert!(season.contains(md(6, 15)));
        assert!(!season.contains(md(6, 14)));
        assert!(!season.contains(md(6, 16)));
    }

    #[test]
    fn test_active_hours_plain_window() {
        let hours = ActiveHours {
            enabled: true,
            start_hour: 9,
            end_hour: 17,
        };
        assert!(hours.contains_hour(9));
        assert!(hours.contains_hour(12));
        assert!(hours.contains_hour(17));
        assert!(!hours.contains_hour(8));
        assert!(!hours.contains_hour(18));
    }

    #[test]
    fn test_active_hours_wrap_midnight() {
        // 20:00 through 06:59
        let hours = ActiveHours {
            enabled: true,
            start_hour: 20,
            end_hour: 6,
        };
        assert!(hours.contains_hour(23));
        assert!(hours.contains_hour(0));
        assert!(hours.contains_hour(3));
        assert!(hours.contains_hour(20));
        assert!(hours.contains_hour(6));
        assert!(!hours.contains_hour(12));
        assert!(!hours.contains_hour(7));
        assert!(!hours.contains_hour(19));
    }

    #[test]
    fn test_active_hours_disabled_passes_everything() {
        let hours = ActiveHours {
            enabled: false,
            start_hour: 20,
            end_hour: 6,
        };
        for hour in 0..24 {
            assert!(hours.contains_hour(hour));
        }
    }

    #[test]
    fn test_active_hours_validation() {
        let bad = ActiveHours {
            enabled: true,
            start_hour: 24,
            end_hour: 6,
        };
        assert_eq!(bad.validate(), Err(ScheduleError::InvalidHour(24)));
    }
}
