//! # Analytics Module
//!
//! Analytics cards: headline value, simulated change against the previous
//! period and a trend line shaped by the period's view buckets
//!
//! ## Key Components
//! - [`AnalyticsData`] - The four analytics cards for a period
//! - [`generate_trends`] - Trend points scaled from the view chart
//! - [`calculate_percentage_change`] - Change badge against a simulated previous period
//! - [`percentage_changes`] - Point-to-point percent changes of a trend

use chrono::NaiveDateTime;
use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::aggregator::{ChartSeries, get_chart_data};
use crate::funnel::{DashboardMetrics, calculate_dashboard_metrics};
use crate::models::Video;
use crate::period::FilterPeriod;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Conversion,
    Visits,
    Calls,
    Revenue,
}

impl MetricKind {
    /// Range of the multiplier applied on top of the period factor
    pub fn variance_range(&self) -> (f64, f64) {
        match self {
            MetricKind::Conversion => (0.9, 1.1),
            MetricKind::Visits => (0.8, 1.1),
            MetricKind::Calls => (0.85, 1.1),
            MetricKind::Revenue => (0.6, 1.0),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MetricKind::Conversion => "Overall Performance",
            MetricKind::Visits => "Page Visits",
            MetricKind::Calls => "Calls Booked",
            MetricKind::Revenue => "Revenue",
        }
    }
}

/// Previous-period value synthesized from the current one
pub fn simulate_previous(current: f64, factor: f64, multiplier: f64) -> f64 {
    current * factor * multiplier
}

/// `(current - previous) / previous` as a percentage, 0 when there is no baseline
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeBadge {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub label: String,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricCard {
    pub title: String,
    pub value: f64,
    pub change: ChangeBadge,
    pub trends: Vec<u64>,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    pub period: FilterPeriod,
    pub summary: MetricCard,
    pub page_visits: MetricCard,
    pub calls: MetricCard,
    pub revenue: MetricCard,
}

impl AnalyticsData {
    pub fn cards(&self) -> [&MetricCard; 4] {
        [&self.summary, &self.page_visits, &self.calls, &self.revenue]
    }
}

pub fn calculate_percentage_change<R: Rng + ?Sized>(
    current: f64,
    kind: MetricKind,
    period: FilterPeriod,
    rng: &mut R,
) -> ChangeBadge {
    let (low, high) = kind.variance_range();
    let previous = simulate_previous(current, period.comparison_factor(), rng.gen_range(low..high));
    let percent = percent_change(current, previous);

    let (sign, kind) = if percent >= 0.0 {
        ("+", ChangeKind::Positive)
    } else {
        ("-", ChangeKind::Negative)
    };

    ChangeBadge {
        value: format!("{}{:.1}%", sign, percent.abs()),
        kind,
        label: period.comparison_label().to_string(),
        percent,
    }
}

/// One trend point per chart bucket.
///
/// Each point scales `current` by the bucket's share of the busiest bucket,
/// a linear growth progression across the series and a ±5% jitter.
pub fn generate_trends<R: Rng + ?Sized>(
    current: f64,
    is_percentage: bool,
    chart: &ChartSeries,
    rng: &mut R,
) -> Vec<u64> {
    let max = chart.max_value();
    let len = chart.data.len();

    chart
        .data
        .iter()
        .enumerate()
        .map(|(i, &point)| {
            let ratio = if max > 0 { point as f64 / max as f64 } else { 0.0 };
            let factor = 0.6 + ratio * 0.4;
            let progression = if len > 1 {
                0.8 + (i as f64 / (len - 1) as f64) * 0.2
            } else {
                1.0
            };
            let variance = rng.gen_range(0.95..1.05);

            let mut value = current * factor * progression * variance;
            if is_percentage {
                value = value.clamp(0.0, 100.0);
            }
            value.floor().max(0.0) as u64
        })
        .collect()
}

/// Percent change between consecutive trend points
pub fn percentage_changes(trends: &[u64]) -> Vec<f64> {
    trends
        .windows(2)
        .map(|pair| percent_change(pair[1] as f64, pair[0] as f64))
        .collect()
}

fn build_card<R: Rng + ?Sized>(
    kind: MetricKind,
    current: f64,
    period: FilterPeriod,
    chart: &ChartSeries,
    rng: &mut R,
) -> MetricCard {
    MetricCard {
        title: kind.title().to_string(),
        value: current,
        change: calculate_percentage_change(current, kind, period, rng),
        trends: generate_trends(current, kind == MetricKind::Conversion, chart, rng),
        labels: chart.labels.clone(),
    }
}

pub fn build_analytics_from<R: Rng + ?Sized>(
    metrics: &DashboardMetrics,
    chart: &ChartSeries,
    period: FilterPeriod,
    rng: &mut R,
) -> AnalyticsData {
    let conversion = metrics.overall_conversion_rate();
    debug!(
        "Building analytics for {} ({} buckets, conversion {:.4}%)",
        period,
        chart.len(),
        conversion
    );

    AnalyticsData {
        period,
        summary: build_card(MetricKind::Conversion, conversion, period, chart, rng),
        page_visits: build_card(MetricKind::Visits, metrics.website_visitors as f64, period, chart, rng),
        calls: build_card(MetricKind::Calls, metrics.calls_booked as f64, period, chart, rng),
        revenue: build_card(MetricKind::Revenue, metrics.total_revenue as f64, period, chart, rng),
    }
}

pub fn build_analytics<R: Rng + ?Sized>(
    videos: &[Video],
    period: FilterPeriod,
    now: NaiveDateTime,
    rng: &mut R,
) -> AnalyticsData {
    let metrics = calculate_dashboard_metrics(videos, period, now);
    let chart = get_chart_data(videos, period, now);
    build_analytics_from(&metrics, &chart, period, rng)
}
