//! # Table Display Module
//!
//! Terminal rendering for dashboard metrics, view charts, video rankings and analytics cards
//!
//! ## Key Components
//! - [`format_dashboard`] - Funnel summary table
//! - [`format_chart`] - Horizontal bar chart of views per bucket
//! - [`format_videos_table`] - Ranked video table
//! - [`format_analytics`] - Analytics cards with change badges and trends
//! - [`format_number`] / [`format_currency`] - Thousands-separated numbers

use crate::aggregator::ChartSeries;
use crate::analytics::{AnalyticsData, ChangeKind, MetricCard, MetricKind, percentage_changes};
use crate::funnel::DashboardMetrics;
use crate::period::FilterPeriod;
use crate::ranking::RankedVideo;

const GRAY: &str = "\x1b[90m";
const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[39m";

const TITLE_WIDTH: usize = 40;

/// Format numbers with thousands separators
pub fn format_number(n: u64) -> String {
    let mut result = String::new();
    let s = n.to_string();
    let chars: Vec<char> = s.chars().collect();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}

pub fn format_currency(n: u64) -> String {
    format!("${}", format_number(n))
}

fn format_number_compact(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

fn title_box(title: &str) -> String {
    let inner = title.chars().count() + 4;
    let bar = "─".repeat(inner);
    let blank = " ".repeat(inner);

    format!(
        "\n ╭{bar}╮\n │{blank}│\n │  {title}  │\n │{blank}│\n ╰{bar}╯\n\n"
    )
}

pub fn format_dashboard(metrics: &DashboardMetrics, period: FilterPeriod) -> String {
    let mut output = title_box(&format!("Funnel Dashboard - {}", period.display_name()));

    let rows: Vec<(&str, String)> = vec![
        ("YouTube Views", format_number(metrics.youtube_views)),
        ("Unique Views", format_number(metrics.unique_views())),
        ("Website Visitors", format_number(metrics.website_visitors)),
        ("Calls Booked", format_number(metrics.calls_booked)),
        ("Calls Accepted", format_number(metrics.calls_accepted)),
        ("Acceptance Rate", format!("{:.1}%", metrics.acceptance_rate)),
        ("Show-ups", format_number(metrics.show_ups)),
        ("Show-up Rate", format!("{:.1}%", metrics.show_up_rate)),
        ("Closes", format_number(metrics.closes)),
        ("Total Revenue", format_currency(metrics.total_revenue)),
        ("  Paid in Full", format_currency(metrics.pif_revenue)),
        ("  Installments", format_currency(metrics.installment_revenue)),
    ];

    output.push_str(&format!("{GRAY}┌────────────────────┬────────────────┐{RESET}\n"));
    output.push_str(&format!(
        "{GRAY}│{RESET}{CYAN} Metric             {RESET}{GRAY}│{RESET}{CYAN}          Value {RESET}{GRAY}│{RESET}\n"
    ));
    output.push_str(&format!("{GRAY}├────────────────────┼────────────────┤{RESET}\n"));
    for (label, value) in &rows {
        output.push_str(&format!(
            "{GRAY}│{RESET} {:<18} {GRAY}│{RESET} {:>14} {GRAY}│{RESET}\n",
            label, value
        ));
    }
    output.push_str(&format!("{GRAY}└────────────────────┴────────────────┘{RESET}\n"));

    output.push_str(&format!("\n{GREEN}Show-ups{RESET}\n"));
    for slice in &metrics.show_up_stats {
        output.push_str(&format!("  {:<12} {:>10}\n", slice.label, format_number(slice.value)));
    }

    output.push_str(&format!("\n{GREEN}Closes{RESET}\n"));
    for slice in &metrics.closes_stats {
        output.push_str(&format!("  {:<12} {:>10}\n", slice.label, format_number(slice.value)));
    }

    output.push_str(&format!("\n{GREEN}Revenue by Product{RESET}\n"));
    for product in metrics.product_breakdown() {
        output.push_str(&format!("  {:<18} {:>14}\n", product.name, format_currency(product.revenue)));
    }

    output
}

/// Horizontal bars scaled to the busiest bucket
pub fn format_chart(chart: &ChartSeries, period: FilterPeriod, bar_width: usize) -> String {
    let mut output = title_box(&format!("YouTube Views - {}", period.display_name()));

    if chart.is_empty() {
        output.push_str("No buckets for this period.\n");
        return output;
    }

    let max = chart.max_value();
    let label_width = chart.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    for (label, &value) in chart.labels.iter().zip(chart.data.iter()) {
        let filled = if max > 0 {
            ((value as f64 / max as f64) * bar_width as f64).round() as usize
        } else {
            0
        };
        output.push_str(&format!(
            "{:<width$} {CYAN}{}{RESET}{GRAY}{}{RESET} {:>10}\n",
            label,
            "█".repeat(filled),
            "░".repeat(bar_width - filled),
            format_number(value),
            width = label_width
        ));
    }

    output.push_str(&format!("\n{GREEN}Total: {} views{RESET}\n", format_number(chart.total())));
    output
}

pub fn format_videos_table(ranked: &[RankedVideo], period: FilterPeriod) -> String {
    let mut output = title_box(&format!("Top Videos - {}", period.display_name()));

    if ranked.is_empty() {
        output.push_str("No videos with views in this period.\n");
        return output;
    }

    output.push_str(&format!(
        "{GRAY}┌──────┬──────────────────────────────────────────┬──────────┬──────────┬────────┬────────┬──────────────┐{RESET}\n"
    ));
    output.push_str(&format!(
        "{GRAY}│{RESET}{CYAN} Rank {RESET}{GRAY}│{RESET}{CYAN} Title                                    {RESET}{GRAY}│{RESET}{CYAN}    Views {RESET}{GRAY}│{RESET}{CYAN}   Visits {RESET}{GRAY}│{RESET}{CYAN}  Calls {RESET}{GRAY}│{RESET}{CYAN} Closes {RESET}{GRAY}│{RESET}{CYAN}      Revenue {RESET}{GRAY}│{RESET}\n"
    ));
    output.push_str(&format!(
        "{GRAY}├──────┼──────────────────────────────────────────┼──────────┼──────────┼────────┼────────┼──────────────┤{RESET}\n"
    ));

    let mut total_revenue = 0u64;
    for entry in ranked {
        output.push_str(&format!(
            "{GRAY}│{RESET} {:>4} {GRAY}│{RESET} {:<width$} {GRAY}│{RESET} {:>8} {GRAY}│{RESET} {:>8} {GRAY}│{RESET} {:>6} {GRAY}│{RESET} {:>6} {GRAY}│{RESET} {:>12} {GRAY}│{RESET}\n",
            entry.rank,
            truncate(&entry.video.title, TITLE_WIDTH),
            format_number_compact(entry.video.view_count),
            format_number_compact(entry.metrics.page_visits),
            entry.metrics.calls_booked,
            entry.metrics.closed_deals,
            format_currency(entry.metrics.revenue),
            width = TITLE_WIDTH
        ));
        total_revenue += entry.metrics.revenue;
    }

    output.push_str(&format!(
        "{GRAY}└──────┴──────────────────────────────────────────┴──────────┴──────────┴────────┴────────┴──────────────┘{RESET}\n"
    ));
    output.push_str(&format!(
        "\n{GREEN}Attributed revenue: {}{RESET}\n",
        format_currency(total_revenue)
    ));

    output
}

fn format_card_value(kind: MetricKind, value: f64) -> String {
    match kind {
        MetricKind::Conversion => format!("{:.2}%", value),
        MetricKind::Revenue => format_currency(value as u64),
        MetricKind::Visits | MetricKind::Calls => format_number(value as u64),
    }
}

fn format_card(kind: MetricKind, card: &MetricCard) -> String {
    let color = match card.change.kind {
        ChangeKind::Positive => GREEN,
        ChangeKind::Negative => RED,
    };

    let mut output = format!(
        "{CYAN}{}{RESET}\n  {}  {color}{}{RESET} {GRAY}{}{RESET}\n",
        card.title,
        format_card_value(kind, card.value),
        card.change.value,
        card.change.label
    );

    let steps = percentage_changes(&card.trends);
    for (i, (label, point)) in card.labels.iter().zip(card.trends.iter()).enumerate() {
        let step = match i.checked_sub(1).and_then(|prev| steps.get(prev)) {
            Some(change) => format!("{:+.1}%", change),
            None => String::new(),
        };
        output.push_str(&format!(
            "  {GRAY}{:<8}{RESET} {:>14} {GRAY}{:>8}{RESET}\n",
            label,
            format_number(*point),
            step
        ));
    }

    output
}

pub fn format_analytics(data: &AnalyticsData) -> String {
    let mut output = title_box(&format!("Analytics - {}", data.period.display_name()));

    let kinds = [
        MetricKind::Conversion,
        MetricKind::Visits,
        MetricKind::Calls,
        MetricKind::Revenue,
    ];
    let cards: Vec<String> = kinds
        .iter()
        .zip(data.cards())
        .map(|(kind, card)| format_card(*kind, card))
        .collect();

    output.push_str(&cards.join("\n"));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::build_analytics_from;
    use crate::models::test_video;
    use crate::video_metrics::VideoMetrics;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(1_249_250), "1,249,250");
        assert_eq!(format_currency(4_750), "$4,750");
    }

    #[test]
    fn test_format_number_compact() {
        assert_eq!(format_number_compact(950), "950");
        assert_eq!(format_number_compact(12_340), "12.3K");
        assert_eq!(format_number_compact(2_500_000), "2.5M");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ünïcödé title", 5), "ünïc…");
    }

    #[test]
    fn test_dashboard_lists_funnel() {
        let output = format_dashboard(&DashboardMetrics::from_views(1_000_000), FilterPeriod::CurrentMonth);
        assert!(output.contains("1,000,000"));
        assert!(output.contains("$1,249,250"));
        assert!(output.contains("Premium Course"));
        assert!(output.contains("No Show"));
    }

    #[test]
    fn test_chart_bars_scale_to_max() {
        let chart = ChartSeries {
            labels: vec!["Jan".to_string(), "Feb".to_string()],
            data: vec![50, 100],
        };
        let output = format_chart(&chart, FilterPeriod::Last3Months, 10);
        let lines: Vec<&str> = output.lines().filter(|l| l.starts_with("Jan") || l.starts_with("Feb")).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].matches('█').count(), 5);
        assert_eq!(lines[1].matches('█').count(), 10);
        assert!(output.contains("Total: 150 views"));
    }

    #[test]
    fn test_chart_all_zero() {
        let chart = ChartSeries {
            labels: vec!["Week 1".to_string()],
            data: vec![0],
        };
        let output = format_chart(&chart, FilterPeriod::CurrentMonth, 8);
        assert_eq!(output.matches('░').count(), 8);
    }

    #[test]
    fn test_videos_table() {
        let ranked = vec![RankedVideo {
            video: test_video("abc", "1 day ago", 12_000),
            metrics: VideoMetrics {
                revenue: 9_500,
                ..VideoMetrics::default()
            },
            ranking_score: 5_700.0,
            rank: 1,
        }];
        let output = format_videos_table(&ranked, FilterPeriod::CurrentMonth);
        assert!(output.contains("Video abc"));
        assert!(output.contains("$9,500"));

        let empty = format_videos_table(&[], FilterPeriod::CurrentMonth);
        assert!(empty.contains("No videos"));
    }

    #[test]
    fn test_analytics_cards_render() {
        let chart = ChartSeries {
            labels: vec!["Apr".to_string(), "May".to_string(), "Jun".to_string()],
            data: vec![10, 20, 30],
        };
        let data = build_analytics_from(
            &DashboardMetrics::from_views(1_000_000),
            &chart,
            FilterPeriod::Last3Months,
            &mut StdRng::seed_from_u64(1),
        );
        let output = format_analytics(&data);
        assert!(output.contains("Overall Performance"));
        assert!(output.contains("0.03%"));
        assert!(output.contains("$1,249,250"));
        assert!(output.contains("vs previous 3 months"));
    }
}
