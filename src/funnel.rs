//! # Funnel Metrics Module
//!
//! Deterministic funnel simulation from YouTube views down to revenue
//!
//! ## Key Components
//! - [`DashboardMetrics`] - Every funnel stage derived from a view total
//! - [`calculate_dashboard_metrics`] - Metrics for a video list and period
//! - [`ProductRevenue`] - Revenue split across product lines

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::aggregator::calculate_views_by_period;
use crate::models::Video;
use crate::period::FilterPeriod;

// Industry-standard conversion assumptions
pub const PAGE_VISIT_RATE: f64 = 0.044;
pub const CALL_BOOKING_RATE: f64 = 0.002;
pub const ACCEPTANCE_RATE: f64 = 0.566;
pub const SHOW_UP_RATE: f64 = 0.867;
pub const CLOSE_RATE: f64 = 0.269;
pub const AVG_DEAL_SIZE: u64 = 4750;
pub const PIF_SHARE: f64 = 0.68;
pub const HIGH_TICKET_SHARE: f64 = 0.618;
pub const DISCOUNT_SHARE: f64 = 0.382;
pub const UNIQUE_VIEW_SHARE: f64 = 0.85;

const PRODUCT_SPLIT: [(&str, f64); 3] = [
    ("Premium Course", 0.55),
    ("Coaching Program", 0.275),
    ("Masterclass", 0.175),
];

/// `floor(value * rate)` for non-negative counts
pub fn apply_rate(value: u64, rate: f64) -> u64 {
    (value as f64 * rate).floor() as u64
}

pub fn percent_of(part: u64, whole: u64) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64 * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatSlice {
    pub value: u64,
    pub label: String,
}

impl StatSlice {
    fn new(value: u64, label: &str) -> Self {
        Self {
            value,
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub youtube_views: u64,
    pub website_visitors: u64,
    pub calls_booked: u64,
    pub calls_accepted: u64,
    pub show_ups: u64,
    pub closes: u64,
    pub show_up_rate: f64,
    pub acceptance_rate: f64,
    pub total_revenue: u64,
    pub pif_revenue: u64,
    pub installment_revenue: u64,
    pub show_up_stats: [StatSlice; 2],
    pub closes_stats: [StatSlice; 2],
}

impl DashboardMetrics {
    /// Run the fixed conversion cascade; each stage is floored before feeding the next
    pub fn from_views(youtube_views: u64) -> Self {
        let website_visitors = apply_rate(youtube_views, PAGE_VISIT_RATE);
        let calls_booked = apply_rate(youtube_views, CALL_BOOKING_RATE);
        let calls_accepted = apply_rate(calls_booked, ACCEPTANCE_RATE);
        let show_ups = apply_rate(calls_accepted, SHOW_UP_RATE);
        let closes = apply_rate(show_ups, CLOSE_RATE);

        let total_revenue = closes * AVG_DEAL_SIZE;
        let pif_revenue = apply_rate(total_revenue, PIF_SHARE);

        Self {
            youtube_views,
            website_visitors,
            calls_booked,
            calls_accepted,
            show_ups,
            closes,
            show_up_rate: percent_of(show_ups, calls_accepted),
            acceptance_rate: percent_of(calls_accepted, calls_booked),
            total_revenue,
            pif_revenue,
            installment_revenue: total_revenue - pif_revenue,
            show_up_stats: [
                StatSlice::new(show_ups, "Showed Up"),
                StatSlice::new(calls_accepted.saturating_sub(show_ups), "No Show"),
            ],
            closes_stats: [
                StatSlice::new(apply_rate(closes, HIGH_TICKET_SHARE), "High-ticket"),
                StatSlice::new(apply_rate(closes, DISCOUNT_SHARE), "Discount"),
            ],
        }
    }

    pub fn unique_views(&self) -> u64 {
        apply_rate(self.youtube_views, UNIQUE_VIEW_SHARE)
    }

    /// Closed deals per view, as a percentage
    pub fn overall_conversion_rate(&self) -> f64 {
        percent_of(self.closes, self.youtube_views)
    }

    pub fn product_breakdown(&self) -> Vec<ProductRevenue> {
        PRODUCT_SPLIT
            .iter()
            .map(|(name, share)| ProductRevenue {
                name: name.to_string(),
                revenue: apply_rate(self.total_revenue, *share),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRevenue {
    pub name: String,
    pub revenue: u64,
}

pub fn calculate_dashboard_metrics(
    videos: &[Video],
    period: FilterPeriod,
    now: NaiveDateTime,
) -> DashboardMetrics {
    DashboardMetrics::from_views(calculate_views_by_period(videos, period, now))
}
