//! Reporting-week helpers.
//!
//! Weekly progress is reported for Sunday–Saturday weeks. These helpers
//! compute the bounds used to prefill a new report.

use chrono::{Datelike, Duration};
use serde::Serialize;

use crate::types::Date;

/// A Sunday–Saturday reporting week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekRange {
    pub week_start: Date,
    pub week_end: Date,
    /// ISO-8601 week number of `week_start`.
    pub week_number: u32,
}

impl WeekRange {
    pub fn contains(&self, day: Date) -> bool {
        self.week_start <= day && day <= self.week_end
    }
}

/// The reporting week containing `today`.
pub fn current_week(today: Date) -> WeekRange {
    let back = i64::from(today.weekday().num_days_from_sunday());
    let week_start = today - Duration::days(back);
    WeekRange {
        week_start,
        week_end: week_start + Duration::days(6),
        week_number: week_number(week_start),
    }
}

/// ISO-8601 week number of `day`.
pub fn week_number(day: Date) -> u32 {
    day.iso_week().week()
}
