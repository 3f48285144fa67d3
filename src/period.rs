//! # Filter Period Module
//!
//! Dashboard filter periods and the absolute windows they resolve to
//!
//! ## Key Components
//! - [`FilterPeriod`] - Selectable reporting period
//! - [`PeriodWindow`] - Resolved start/end instants of a period
//! - [`period_start`] - First instant covered by a period

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use log::warn;
use serde::Serialize;
use std::fmt;

use crate::relative_time::shift_months;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterPeriod {
    #[default]
    CurrentMonth,
    #[serde(rename = "last_3_months")]
    Last3Months,
    #[serde(rename = "last_6_months")]
    Last6Months,
    #[serde(rename = "last_12_months")]
    Last12Months,
}

impl FilterPeriod {
    pub const ALL: [FilterPeriod; 4] = [
        FilterPeriod::CurrentMonth,
        FilterPeriod::Last3Months,
        FilterPeriod::Last6Months,
        FilterPeriod::Last12Months,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterPeriod::CurrentMonth => "current_month",
            FilterPeriod::Last3Months => "last_3_months",
            FilterPeriod::Last6Months => "last_6_months",
            FilterPeriod::Last12Months => "last_12_months",
        }
    }

    /// Parse a period name; anything unrecognized means the current month.
    pub fn parse_lossy(value: &str) -> Self {
        let normalized = value.trim().to_lowercase().replace('-', "_");
        match FilterPeriod::ALL.into_iter().find(|p| p.as_str() == normalized) {
            Some(period) => period,
            None => {
                warn!("Unknown filter period '{}', using current_month", normalized);
                FilterPeriod::CurrentMonth
            }
        }
    }

    pub fn months_back(&self) -> u32 {
        match self {
            FilterPeriod::CurrentMonth => 0,
            FilterPeriod::Last3Months => 3,
            FilterPeriod::Last6Months => 6,
            FilterPeriod::Last12Months => 12,
        }
    }

    /// Shrink factor used to simulate the previous period's totals
    pub fn comparison_factor(&self) -> f64 {
        match self {
            FilterPeriod::CurrentMonth => 0.85,
            FilterPeriod::Last3Months => 0.75,
            FilterPeriod::Last6Months => 0.65,
            FilterPeriod::Last12Months => 0.55,
        }
    }

    pub fn comparison_label(&self) -> &'static str {
        match self {
            FilterPeriod::CurrentMonth => "vs last month",
            FilterPeriod::Last3Months => "vs previous 3 months",
            FilterPeriod::Last6Months => "vs previous 6 months",
            FilterPeriod::Last12Months => "vs previous 12 months",
        }
    }

    /// Prose phrase for reports, e.g. "the last 3 months"
    pub fn context_phrase(&self) -> &'static str {
        match self {
            FilterPeriod::CurrentMonth => "this month",
            FilterPeriod::Last3Months => "the last 3 months",
            FilterPeriod::Last6Months => "the last 6 months",
            FilterPeriod::Last12Months => "the last 12 months",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FilterPeriod::CurrentMonth => "Current Month",
            FilterPeriod::Last3Months => "Last 3 Months",
            FilterPeriod::Last6Months => "Last 6 Months",
            FilterPeriod::Last12Months => "Last 12 Months",
        }
    }
}

impl fmt::Display for FilterPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl PeriodWindow {
    pub fn resolve(period: FilterPeriod, now: NaiveDateTime) -> Self {
        Self {
            start: period_start(period, now),
            end: now,
        }
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at <= self.end
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Midnight on the first day of the month `months_back` months before `now`'s month
pub fn month_start(now: NaiveDateTime, months_back: u32) -> NaiveDateTime {
    let first = start_of_day(first_of_month(now.date()));
    shift_months(first, -i64::from(months_back)).unwrap_or(first)
}

pub fn period_start(period: FilterPeriod, now: NaiveDateTime) -> NaiveDateTime {
    month_start(now, period.months_back())
}
