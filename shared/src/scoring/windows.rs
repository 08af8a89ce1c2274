//! Window detector
//!
//! Groups evaluated hours into local calendar days and looks for an unbroken
//! run of promising hours inside each day's flyable window.

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::{DayVerdict, EvaluatedHour, ForecastVerdict};
use crate::types::{HourRange, Verdict};

pub const DEFAULT_MIN_RUN_LENGTH: usize = 3;

/// Which local hours count and how many consecutive promising hours make a day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WindowConfig {
    #[serde(default)]
    pub flyable_hours: HourRange,
    #[serde(default = "default_min_run_length")]
    pub min_run_length: usize,
}

fn default_min_run_length() -> usize {
    DEFAULT_MIN_RUN_LENGTH
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            flyable_hours: HourRange::default(),
            min_run_length: DEFAULT_MIN_RUN_LENGTH,
        }
    }
}

impl WindowConfig {
    /// Run length actually used by the scan; zero behaves like one
    pub fn effective_run_length(&self) -> usize {
        self.min_run_length.max(1)
    }
}

/// Whether `hours` contains `run_length` consecutive promising hours.
pub fn has_promising_run(hours: &[EvaluatedHour], run_length: usize) -> bool {
    let run_length = run_length.max(1);
    if hours.len() < run_length {
        return false;
    }

    let mut streak = 0;
    for hour in hours {
        if hour.is_promising {
            streak += 1;
            if streak >= run_length {
                return true;
            }
        } else {
            streak = 0;
        }
    }
    false
}

/// Split a forecast into local days and give each one a verdict.
///
/// Days come out in calendar order; hours within a day keep input order.
/// Hours outside the flyable window are dropped from the day's list.
pub fn detect<Tz: TimeZone>(
    hours: Vec<EvaluatedHour>,
    window: &WindowConfig,
    tz: &Tz,
) -> ForecastVerdict {
    let mut by_day: BTreeMap<NaiveDate, Vec<EvaluatedHour>> = BTreeMap::new();

    for hour in hours {
        let local = hour.record.time.with_timezone(tz);
        let date = local.date_naive();
        // Keep the day even when none of its hours are flyable
        let day = by_day.entry(date).or_default();
        if window.flyable_hours.contains(local.hour()) {
            day.push(hour);
        }
    }

    let run_length = window.effective_run_length();
    let days: Vec<DayVerdict> = by_day
        .into_iter()
        .map(|(date, hours)| DayVerdict {
            date,
            result: Verdict::from(has_promising_run(&hours, run_length)),
            hours,
        })
        .collect();

    ForecastVerdict {
        overall: Verdict::from(days.iter().any(|d| d.result.is_positive())),
        days,
    }
}
