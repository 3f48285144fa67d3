//! # View Aggregation Module
//!
//! Period-scoped view totals and bucketed view time series
//!
//! ## Key Components
//! - [`calculate_views_by_period`] - Total views published inside a period
//! - [`period_buckets`] - Weekly or monthly buckets covering a period
//! - [`get_chart_data`] - Index-aligned labels and view sums per bucket
//! - [`ChartSeries`] - Chart-ready series

use chrono::{Datelike, Duration, NaiveDateTime};
use serde::Serialize;

use crate::models::Video;
use crate::period::{FilterPeriod, PeriodWindow, month_start, start_of_day};
use crate::relative_time::parse_published_at;

const DAYS_PER_WEEK_BUCKET: i64 = 7;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub data: Vec<u64>,
}

impl ChartSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn max_value(&self) -> u64 {
        self.data.iter().copied().max().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.data.iter().sum()
    }
}

/// Closed time interval `[start, end]` with a display label
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBucket {
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeBucket {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && at <= self.end
    }
}

// Last representable instant before `next_start`, so adjacent buckets neither
// overlap nor leave a gap
fn end_before(next_start: NaiveDateTime) -> NaiveDateTime {
    next_start - Duration::nanoseconds(1)
}

/// Sum of view counts for videos published inside the period window
pub fn calculate_views_by_period(videos: &[Video], period: FilterPeriod, now: NaiveDateTime) -> u64 {
    let window = PeriodWindow::resolve(period, now);

    videos
        .iter()
        .filter(|video| window.contains(parse_published_at(&video.published_at, now)))
        .map(|video| video.view_count)
        .sum()
}

/// Videos whose parsed publish time falls inside the period window
pub fn filter_videos_by_period<'a>(
    videos: &'a [Video],
    period: FilterPeriod,
    now: NaiveDateTime,
) -> Vec<&'a Video> {
    let window = PeriodWindow::resolve(period, now);
    videos
        .iter()
        .filter(|video| window.contains(parse_published_at(&video.published_at, now)))
        .collect()
}

/// 7-day buckets from the 1st of the current month up to `now`
fn weekly_buckets(now: NaiveDateTime) -> Vec<TimeBucket> {
    let month_begin = month_start(now, 0);
    let month_end = end_before(month_begin.checked_add_months(chrono::Months::new(1)).unwrap_or(now));

    let mut buckets = Vec::new();
    let mut week_start = month_begin;
    let mut week_number = 1;

    while week_start.month() == month_begin.month() && week_start <= now {
        let next_start = start_of_day(week_start.date() + Duration::days(DAYS_PER_WEEK_BUCKET));
        let week_end = end_before(next_start).min(month_end).min(now);

        buckets.push(TimeBucket {
            label: format!("Week {}", week_number),
            start: week_start,
            end: week_end,
        });

        week_start = next_start;
        week_number += 1;
    }

    buckets
}

/// One bucket per calendar month, oldest first, ending with the current month
fn monthly_buckets(now: NaiveDateTime, months: u32) -> Vec<TimeBucket> {
    (0..months)
        .rev()
        .map(|back| {
            let start = month_start(now, back);
            let next_start = if back == 0 {
                start.checked_add_months(chrono::Months::new(1)).unwrap_or(now)
            } else {
                month_start(now, back - 1)
            };

            TimeBucket {
                label: start.format("%b").to_string(),
                start,
                end: end_before(next_start).min(now),
            }
        })
        .collect()
}

pub fn period_buckets(period: FilterPeriod, now: NaiveDateTime) -> Vec<TimeBucket> {
    match period {
        FilterPeriod::CurrentMonth => weekly_buckets(now),
        other => monthly_buckets(now, other.months_back()),
    }
}

/// Views per bucket for the selected period
pub fn get_chart_data(videos: &[Video], period: FilterPeriod, now: NaiveDateTime) -> ChartSeries {
    let buckets = period_buckets(period, now);
    let published: Vec<(NaiveDateTime, u64)> = videos
        .iter()
        .map(|video| (parse_published_at(&video.published_at, now), video.view_count))
        .collect();

    let data: Vec<u64> = buckets
        .iter()
        .map(|bucket| {
            published
                .iter()
                .filter(|(at, _)| bucket.contains(*at))
                .map(|(_, views)| views)
                .sum::<u64>()
        })
        .collect();

    ChartSeries {
        labels: buckets.into_iter().map(|b| b.label).collect(),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::test_video;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    fn sample_videos() -> Vec<Video> {
        vec![
            test_video("a", "2 days ago", 1_000),
            test_video("b", "2 weeks ago", 5_000),
            test_video("c", "2 months ago", 20_000),
            test_video("d", "5 months ago", 40_000),
            test_video("e", "11 months ago", 80_000),
            test_video("f", "3 years ago", 1_000_000),
        ]
    }

    #[test]
    fn test_views_by_period() {
        let now = at(2025, 6, 18, 12);
        let videos = sample_videos();

        assert_eq!(calculate_views_by_period(&videos, FilterPeriod::CurrentMonth, now), 6_000);
        assert_eq!(calculate_views_by_period(&videos, FilterPeriod::Last3Months, now), 26_000);
        assert_eq!(calculate_views_by_period(&videos, FilterPeriod::Last6Months, now), 66_000);
        assert_eq!(calculate_views_by_period(&videos, FilterPeriod::Last12Months, now), 146_000);
    }

    #[test]
    fn test_views_empty_collection() {
        let now = at(2025, 6, 18, 12);
        for period in FilterPeriod::ALL {
            assert_eq!(calculate_views_by_period(&[], period, now), 0);
        }
    }

    #[test]
    fn test_unparseable_dates_count_as_now() {
        let now = at(2025, 6, 18, 12);
        let videos = vec![test_video("x", "premiered recently", 700)];
        assert_eq!(calculate_views_by_period(&videos, FilterPeriod::CurrentMonth, now), 700);
    }

    #[test]
    fn test_filter_videos_by_period() {
        let now = at(2025, 6, 18, 12);
        let videos = sample_videos();
        let ids: Vec<&str> = filter_videos_by_period(&videos, FilterPeriod::Last3Months, now)
            .iter()
            .map(|v| v.video_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_weekly_buckets_mid_month() {
        let now = at(2025, 6, 18, 12);
        let buckets = period_buckets(FilterPeriod::CurrentMonth, now);

        let labels: Vec<&str> = buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Week 1", "Week 2", "Week 3"]);
        assert_eq!(buckets[0].start, at(2025, 6, 1, 0));
        assert_eq!(buckets[1].start, at(2025, 6, 8, 0));
        assert_eq!(buckets[2].start, at(2025, 6, 15, 0));
        assert_eq!(buckets[2].end, now);
    }

    #[test]
    fn test_weekly_buckets_clip_to_month_end() {
        let now = at(2025, 6, 30, 22);
        let buckets = period_buckets(FilterPeriod::CurrentMonth, now);
        assert_eq!(buckets.len(), 5);
        assert_eq!(buckets[4].start, at(2025, 6, 29, 0));
        assert_eq!(buckets[4].end, now);

        // A 31-day month ending mid-week: last bucket stops at the month boundary
        let now = at(2025, 8, 31, 23);
        let buckets = period_buckets(FilterPeriod::CurrentMonth, now);
        assert_eq!(buckets.len(), 5);
        assert_eq!(buckets[4].start, at(2025, 8, 29, 0));
        assert!(buckets[4].end <= now);
        assert_eq!(buckets[4].end.date(), NaiveDate::from_ymd_opt(2025, 8, 31).unwrap());
    }

    #[test]
    fn test_first_day_of_month_has_one_bucket() {
        let now = at(2025, 7, 1, 0);
        let buckets = period_buckets(FilterPeriod::CurrentMonth, now);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].start, now);
        assert_eq!(buckets[0].end, now);
    }

    #[test]
    fn test_monthly_labels() {
        let now = at(2025, 2, 10, 9);
        let series = get_chart_data(&[], FilterPeriod::Last3Months, now);
        assert_eq!(series.labels, vec!["Dec", "Jan", "Feb"]);

        let series = get_chart_data(&[], FilterPeriod::Last12Months, now);
        assert_eq!(series.labels.len(), 12);
        assert_eq!(series.labels.first().map(String::as_str), Some("Mar"));
        assert_eq!(series.labels.last().map(String::as_str), Some("Feb"));
    }

    #[test]
    fn test_buckets_contiguous_and_aligned() {
        let now = at(2025, 6, 18, 12);
        for period in FilterPeriod::ALL {
            let buckets = period_buckets(period, now);
            assert!(!buckets.is_empty());
            assert_eq!(buckets.last().unwrap().end, now);
            for pair in buckets.windows(2) {
                assert!(pair[0].start <= pair[0].end);
                assert_eq!(pair[0].end + Duration::nanoseconds(1), pair[1].start);
            }

            let series = get_chart_data(&sample_videos(), period, now);
            assert_eq!(series.labels.len(), series.data.len());
            assert_eq!(series.len(), buckets.len());
        }

        let monthly = period_buckets(FilterPeriod::Last6Months, now);
        assert_eq!(monthly.first().unwrap().start, at(2025, 1, 1, 0));
    }

    #[test]
    fn test_each_video_lands_in_one_bucket() {
        let now = at(2025, 6, 18, 12);
        let videos = sample_videos();

        let weekly = get_chart_data(&videos, FilterPeriod::CurrentMonth, now);
        // "2 days ago" is June 16 (Week 3), "2 weeks ago" is June 4 (Week 1)
        assert_eq!(weekly.data, vec![5_000, 0, 1_000]);

        let monthly = get_chart_data(&videos, FilterPeriod::Last12Months, now);
        assert_eq!(monthly.total(), 146_000);
        assert_eq!(monthly.max_value(), 80_000);
    }

    #[test]
    fn test_week_boundary_instant() {
        // 7 days after the 1st at 12:00 is the 8th, which opens Week 2
        let now = at(2025, 6, 15, 12);
        let videos = vec![
            test_video("early", "7 days ago", 10),
            test_video("late", "8 days ago", 100),
        ];
        let series = get_chart_data(&videos, FilterPeriod::CurrentMonth, now);
        assert_eq!(series.data, vec![100, 10, 0]);
    }
}
