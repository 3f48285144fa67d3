//! # Insights Module
//!
//! Collects every derived number into one snapshot for narrative generation
//!
//! ## Key Components
//! - [`InsightsData`] - Snapshot handed to the text generator or the fallback report
//! - [`build_insights_data`] - Compose totals, funnel, top videos and comparisons
//! - [`PeriodComparison`] - Simulated change against the previous period

use chrono::NaiveDateTime;
use rand::Rng;
use serde::Serialize;

use crate::aggregator::{ChartSeries, get_chart_data};
use crate::analytics::{percent_change, simulate_previous};
use crate::funnel::{DISCOUNT_SHARE, DashboardMetrics, HIGH_TICKET_SHARE, PIF_SHARE, calculate_dashboard_metrics};
use crate::models::Video;
use crate::period::FilterPeriod;
use crate::ranking::{RankedVideo, rank_videos};

/// Number of top videos listed as call-booking sources
pub const BOOKING_SOURCE_LIMIT: usize = 5;
const INSTALLMENT_SHARE: f64 = 0.32;

#[derive(Debug, Clone, Serialize)]
pub struct YoutubeSummary {
    pub total_views: u64,
    pub unique_views: u64,
    pub top_videos: Vec<RankedVideo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaymentSplit {
    pub pif: u64,
    pub installments: u64,
}

impl PaymentSplit {
    fn of_closes(closes: u64, tier_share: f64) -> Self {
        let tier = closes as f64 * tier_share;
        Self {
            pif: (tier * PIF_SHARE).floor() as u64,
            installments: (tier * INSTALLMENT_SHARE).floor() as u64,
        }
    }
}

/// Payment-processor shaped summary derived from the funnel numbers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentSummary {
    pub month: String,
    pub new_cash_collected: PaymentSplit,
    pub total_cash_collected: u64,
    pub high_ticket_closes: PaymentSplit,
    pub discount_closes: PaymentSplit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoSource {
    pub video_id: String,
    pub video_title: String,
    pub calls_booked: u64,
    pub accepted: u64,
    pub show_ups: u64,
    pub revenue: u64,
}

/// Call-booking shaped summary derived from the funnel numbers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSummary {
    pub month: String,
    pub total_booked: u64,
    pub accepted: u64,
    pub show_ups: u64,
    pub cancelled: u64,
    pub video_sources: Vec<VideoSource>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricChange {
    pub previous: u64,
    pub change: f64,
    pub is_positive: bool,
}

/// Fabricated comparison: the previous period is the current one shrunk by
/// the period factor and a per-metric random multiplier, not a measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    pub period: String,
    pub youtube_views: MetricChange,
    pub website_visitors: MetricChange,
    pub calls_booked: MetricChange,
    pub revenue: MetricChange,
    pub conversion_rate: MetricChange,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightsData {
    pub period: FilterPeriod,
    pub youtube: YoutubeSummary,
    pub funnel: DashboardMetrics,
    pub kajabi: PaymentSummary,
    pub cal: BookingSummary,
    pub trends: ChartSeries,
    pub comparison: PeriodComparison,
}

fn calculate_change<R: Rng + ?Sized>(current: f64, factor: f64, spread: f64, rng: &mut R) -> MetricChange {
    let previous = simulate_previous(current, factor, 0.8 + rng.gen_range(0.0..1.0) * spread);
    let change = (percent_change(current, previous) * 10.0).round() / 10.0;

    MetricChange {
        previous: previous.floor() as u64,
        change,
        is_positive: change >= 0.0,
    }
}

pub fn compare_with_previous_period<R: Rng + ?Sized>(
    metrics: &DashboardMetrics,
    period: FilterPeriod,
    rng: &mut R,
) -> PeriodComparison {
    let factor = period.comparison_factor();

    PeriodComparison {
        period: period.comparison_label().to_string(),
        youtube_views: calculate_change(metrics.youtube_views as f64, factor, 0.4, rng),
        website_visitors: calculate_change(metrics.website_visitors as f64, factor, 0.3, rng),
        calls_booked: calculate_change(metrics.calls_booked as f64, factor, 0.5, rng),
        revenue: calculate_change(metrics.total_revenue as f64, factor, 0.6, rng),
        conversion_rate: calculate_change(metrics.overall_conversion_rate(), factor, 0.3, rng),
    }
}

pub fn payment_summary(metrics: &DashboardMetrics, month: &str) -> PaymentSummary {
    PaymentSummary {
        month: month.to_string(),
        new_cash_collected: PaymentSplit {
            pif: metrics.pif_revenue,
            installments: metrics.installment_revenue,
        },
        total_cash_collected: metrics.total_revenue,
        high_ticket_closes: PaymentSplit::of_closes(metrics.closes, HIGH_TICKET_SHARE),
        discount_closes: PaymentSplit::of_closes(metrics.closes, DISCOUNT_SHARE),
    }
}

pub fn booking_summary(metrics: &DashboardMetrics, top_videos: &[RankedVideo], month: &str) -> BookingSummary {
    BookingSummary {
        month: month.to_string(),
        total_booked: metrics.calls_booked,
        accepted: metrics.calls_accepted,
        show_ups: metrics.show_ups,
        cancelled: metrics.calls_booked.saturating_sub(metrics.calls_accepted),
        video_sources: top_videos
            .iter()
            .take(BOOKING_SOURCE_LIMIT)
            .map(|ranked| VideoSource {
                video_id: ranked.video.video_id.clone(),
                video_title: ranked.video.title.clone(),
                calls_booked: ranked.metrics.calls_booked,
                accepted: ranked.metrics.calls_accepted,
                show_ups: ranked.metrics.show_ups,
                revenue: ranked.metrics.revenue,
            })
            .collect(),
    }
}

/// Assemble the insights snapshot for a period
pub fn build_insights_data<R: Rng + ?Sized>(
    videos: &[Video],
    period: FilterPeriod,
    now: NaiveDateTime,
    rng: &mut R,
) -> InsightsData {
    let funnel = calculate_dashboard_metrics(videos, period, now);
    let trends = get_chart_data(videos, period, now);
    let top_videos = rank_videos(videos, period, now, rng);
    let month = now.format("%Y-%m").to_string();

    let kajabi = payment_summary(&funnel, &month);
    let cal = booking_summary(&funnel, &top_videos, &month);
    let comparison = compare_with_previous_period(&funnel, period, rng);

    InsightsData {
        period,
        youtube: YoutubeSummary {
            total_views: funnel.youtube_views,
            unique_views: funnel.unique_views(),
            top_videos,
        },
        funnel,
        kajabi,
        cal,
        trends,
        comparison,
    }
}
