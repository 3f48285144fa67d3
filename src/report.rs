//! # Report Module
//!
//! Deterministic markdown business report used when AI generation is unavailable
//!
//! ## Key Components
//! - [`generate_detailed_analysis`] - Render an insights snapshot as markdown
//! - [`calculate_potential_increase`] - Revenue upside at an industry-standard close rate

use crate::funnel::percent_of;
use crate::insights::InsightsData;
use crate::table_display::{format_currency, format_number};

/// Views-to-close rate (percent) considered industry standard
const INDUSTRY_CLOSE_RATE: f64 = 0.25;
const HIGH_TRAFFIC_VIEWS: u64 = 50_000;

/// Percentage revenue increase if the funnel closed at [`INDUSTRY_CLOSE_RATE`]
pub fn calculate_potential_increase(data: &InsightsData) -> i64 {
    let total_revenue = data.funnel.total_revenue;
    if total_revenue == 0 {
        return 0;
    }

    let potential_closes = (data.youtube.total_views as f64 * (INDUSTRY_CLOSE_RATE / 100.0)).floor();
    let avg_deal = total_revenue as f64 / data.funnel.closes.max(1) as f64;
    let potential_revenue = potential_closes * avg_deal;

    ((potential_revenue - total_revenue as f64) / total_revenue as f64 * 100.0).floor() as i64
}

fn bottlenecks(views_to_calls: f64, show_up_rate: f64, calls_to_closes: f64) -> Vec<&'static str> {
    let mut found = Vec::new();
    if views_to_calls < 0.15 {
        found.push("Low view-to-call conversion rate");
    }
    if show_up_rate < 80.0 {
        found.push("Poor show-up rate");
    }
    if calls_to_closes < 20.0 {
        found.push("Low call-to-close conversion");
    }
    found
}

fn show_up_verdict(rate: f64) -> &'static str {
    if rate >= 85.0 {
        "(Excellent!)"
    } else if rate >= 75.0 {
        "(Good)"
    } else {
        "(Needs improvement)"
    }
}

/// Render the fallback analysis. Pure function of the snapshot.
pub fn generate_detailed_analysis(data: &InsightsData) -> String {
    let youtube = &data.youtube;
    let funnel = &data.funnel;
    let kajabi = &data.kajabi;
    let comparison = &data.comparison;

    let overall_conversion = percent_of(funnel.closes, youtube.total_views);
    let views_to_calls = percent_of(funnel.calls_booked, youtube.total_views);
    let calls_to_closes = percent_of(funnel.closes, funnel.calls_booked);
    let revenue_per_view = if youtube.total_views > 0 {
        funnel.total_revenue as f64 / youtube.total_views as f64
    } else {
        0.0
    };
    let revenue_change = comparison.revenue.change;
    let top_video = youtube.top_videos.first();
    let found_bottlenecks = bottlenecks(views_to_calls, funnel.show_up_rate, calls_to_closes);

    let mut out = String::new();

    out.push_str("# AI-Powered Business Insights\n\n");
    out.push_str("## Executive Summary\n\n");
    out.push_str(&format!(
        "Revenue {} **{:.1}%** {}, generating **{}** from **{}** closed deals. \
         Your funnel is converting at **{:.2}%** overall, generating **${:.2}** per YouTube view.\n\n",
        if revenue_change >= 0.0 { "increased" } else { "decreased" },
        revenue_change.abs(),
        comparison.period,
        format_currency(funnel.total_revenue),
        format_number(funnel.closes),
        overall_conversion,
        revenue_per_view
    ));
    if let Some(top) = top_video {
        out.push_str(&format!(
            "Your top-performing video \"{}\" generated **{}** from **{}** views.\n\n",
            top.video.title,
            format_currency(top.metrics.revenue),
            format_number(top.video.view_count)
        ));
    }
    out.push_str("---\n\n");

    let pif_share = percent_of(kajabi.new_cash_collected.pif, kajabi.total_cash_collected);
    out.push_str("## Key Wins\n\n");
    out.push_str("### Performance Highlights\n");
    out.push_str(&format!(
        "- **{}** total revenue generated {}\n",
        format_currency(funnel.total_revenue),
        data.period.context_phrase()
    ));
    out.push_str(&format!(
        "- **{:.1}%** show-up rate {}\n",
        funnel.show_up_rate,
        show_up_verdict(funnel.show_up_rate)
    ));
    out.push_str(&format!(
        "- **{}** from paid-in-full customers ({:.1}% of revenue)\n",
        format_currency(kajabi.new_cash_collected.pif),
        pif_share
    ));
    out.push_str(&format!("- **{}** videos driving meaningful results\n\n", youtube.top_videos.len()));

    out.push_str("### Top Performing Content\n");
    let top_three: Vec<String> = youtube
        .top_videos
        .iter()
        .take(3)
        .enumerate()
        .map(|(i, ranked)| {
            format!(
                "{}. **\"{}\"**\n   - {} views -> {} revenue\n   - {} calls booked -> {} closes",
                i + 1,
                ranked.video.title,
                format_number(ranked.video.view_count),
                format_currency(ranked.metrics.revenue),
                ranked.metrics.calls_booked,
                ranked.metrics.closed_deals
            )
        })
        .collect();
    out.push_str(&format!("{}\n\n", top_three.join("\n\n")));
    out.push_str("---\n\n");

    out.push_str("## Areas for Improvement\n\n");
    out.push_str("### Funnel Analysis\n");
    if found_bottlenecks.is_empty() {
        out.push_str("**No major bottlenecks detected** - Your funnel is performing well overall!\n\n");
    } else {
        out.push_str("**Critical Bottlenecks Identified:**\n");
        for bottleneck in &found_bottlenecks {
            out.push_str(&format!("- {}\n", bottleneck));
        }
        out.push('\n');
    }
    out.push_str("### Conversion Opportunities\n");
    out.push_str(&format!(
        "- **View to Call Rate**: {:.2}% {}\n",
        views_to_calls,
        if views_to_calls < 0.2 { "(Industry standard: 0.2-0.5%)" } else { "(Solid performance)" }
    ));
    out.push_str(&format!(
        "- **Call to Close Rate**: {:.2}% {}\n",
        calls_to_closes,
        if calls_to_closes < 25.0 { "(Target: 25-35%)" } else { "(Good performance)" }
    ));
    out.push_str(&format!(
        "- **Show-up Rate**: {:.1}% {}\n\n",
        funnel.show_up_rate,
        if funnel.show_up_rate < 80.0 { "(Target: 85%+)" } else { "(Excellent)" }
    ));
    out.push_str("---\n\n");

    out.push_str("## Video Performance Analysis\n\n");
    out.push_str("### Revenue Drivers\n");
    let drivers: Vec<String> = youtube
        .top_videos
        .iter()
        .take(2)
        .map(|ranked| {
            let views = ranked.video.view_count;
            let per_view = if views > 0 { ranked.metrics.revenue as f64 / views as f64 } else { 0.0 };
            format!(
                "**\"{}\"**\n- Revenue per view: ${:.3}\n- Conversion rate: {:.3}%\n- Total impact: {}",
                ranked.video.title,
                per_view,
                percent_of(ranked.metrics.closed_deals, views),
                format_currency(ranked.metrics.revenue)
            )
        })
        .collect();
    out.push_str(&format!("{}\n\n", drivers.join("\n\n")));
    out.push_str("---\n\n");

    let top_title = top_video
        .map(|t| t.video.title.as_str())
        .unwrap_or("your top-performing video");
    out.push_str("## Actionable Recommendations\n\n");
    out.push_str("### Immediate Actions (Next 7 Days)\n");
    out.push_str(&format!(
        "1. **Double Down on Top Content**: Create 2-3 variations of \"{}\" focusing on the same topic/angle\n",
        top_title
    ));
    out.push_str(&format!(
        "2. **Optimize Call Booking**: {}\n",
        if views_to_calls < 0.2 {
            "Improve your call-to-action and landing page to boost view-to-call conversion"
        } else {
            "Test different call booking times and reduce friction in the process"
        }
    ));
    out.push_str(&format!(
        "3. **Improve Show-ups**: {}\n\n",
        if funnel.show_up_rate < 85.0 {
            "Implement SMS reminders and confirmation sequences to boost show-up rates"
        } else {
            "Maintain current show-up strategies - they're working well"
        }
    ));
    out.push_str("### Strategic Initiatives (Next 30 Days)\n");
    out.push_str("1. **Content Amplification**: Repurpose your top 3 videos into different formats (shorts, carousels, email series)\n");
    out.push_str(&format!(
        "2. **Funnel Optimization**: {}\n",
        if found_bottlenecks.is_empty() {
            "A/B test different closing techniques to improve deal size"
        } else {
            "Focus on fixing the identified bottlenecks"
        }
    ));
    out.push_str("3. **Lead Quality**: Analyze what makes your top videos attract high-converting leads and replicate those elements\n\n");
    out.push_str("### Growth Opportunities\n");
    out.push_str(&format!(
        "- **Revenue Potential**: If you achieve industry-standard conversion rates, you could increase revenue by **{}%**\n",
        calculate_potential_increase(data)
    ));
    out.push_str(&format!(
        "- **Scale Focus**: {}\n\n",
        if youtube.total_views > HIGH_TRAFFIC_VIEWS {
            "You have good traffic volume - focus on conversion optimization"
        } else {
            "Increase content production to drive more top-of-funnel traffic"
        }
    ));
    out.push_str("---\n\n");

    let avg_deal = if funnel.total_revenue > 0 && funnel.closes > 0 {
        funnel.total_revenue / funnel.closes
    } else {
        0
    };
    out.push_str("## Performance Tracking\n\n");
    out.push_str("**Key Metrics to Monitor:**\n");
    out.push_str(&format!(
        "- Revenue per view: Currently ${:.2} ({})\n",
        revenue_per_view,
        if revenue_change >= 0.0 { "trending up" } else { "trending down" }
    ));
    out.push_str(&format!("- Overall conversion: {:.2}%\n", overall_conversion));
    out.push_str(&format!("- Average deal size: {}\n\n", format_currency(avg_deal)));
    out.push_str("*Next review recommended in 7 days to track improvement progress.*");

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::build_insights_data;
    use crate::models::test_video;
    use crate::period::FilterPeriod;
    use chrono::NaiveDate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn snapshot(views: &[u64]) -> InsightsData {
        let now = NaiveDate::from_ymd_opt(2025, 6, 18).unwrap().and_hms_opt(12, 0, 0).unwrap();
        let videos: Vec<_> = views
            .iter()
            .enumerate()
            .map(|(i, v)| test_video(&format!("v{}", i), "2 days ago", *v))
            .collect();
        build_insights_data(&videos, FilterPeriod::CurrentMonth, now, &mut StdRng::seed_from_u64(99))
    }

    #[test]
    fn test_report_contains_formatted_revenue() {
        let data = snapshot(&[1_000_000]);
        let report = generate_detailed_analysis(&data);

        assert!(!report.is_empty());
        assert!(report.contains("$1,249,250"));
        assert!(report.contains("## Executive Summary"));
        assert!(report.contains("## Actionable Recommendations"));
        assert!(report.contains("this month"));
        assert!(report.contains("Video v0"));
    }

    #[test]
    fn test_report_is_deterministic_for_a_snapshot() {
        let data = snapshot(&[300_000, 80_000, 12_000]);
        assert_eq!(generate_detailed_analysis(&data), generate_detailed_analysis(&data));
    }

    #[test]
    fn test_empty_snapshot_still_renders() {
        let data = snapshot(&[]);
        let report = generate_detailed_analysis(&data);
        assert!(report.contains("$0"));
        assert!(report.contains("your top-performing video"));
        assert!(report.contains("Increase content production"));
        assert_eq!(calculate_potential_increase(&data), 0);
    }

    #[test]
    fn test_bottleneck_detection() {
        assert_eq!(bottlenecks(0.1, 70.0, 10.0).len(), 3);
        assert!(bottlenecks(0.2, 86.0, 26.0).is_empty());
        assert_eq!(bottlenecks(0.2, 79.9, 26.0), vec!["Poor show-up rate"]);
    }

    #[test]
    fn test_potential_increase() {
        // 1M views: 263 closes vs 2,500 at a 0.25% close rate
        let data = snapshot(&[1_000_000]);
        assert_eq!(calculate_potential_increase(&data), 850);
    }
}
