//! # Commands Module
//!
//! Command handlers for the dashboard, chart, videos, analytics and insights views
//!
//! ## Key Components
//! - [`CommandContext`] - Configuration, clock and random source shared by every command
//! - [`load_videos`] - Video list from `--videos-file` or the video API
//! - [`handle_dashboard_command`] - Funnel metrics for a period
//! - [`handle_chart_command`] - Views per bucket
//! - [`handle_videos_command`] - Ranked videos
//! - [`handle_analytics_command`] - Analytics cards
//! - [`handle_insights_command`] - Narrative insights or their snapshot

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::{debug, info};
use rand::rngs::StdRng;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};

use crate::aggregator::{filter_videos_by_period, get_chart_data};
use crate::ai_client::{InsightsClient, generate_ai_insights};
use crate::analytics::build_analytics;
use crate::config::AppConfig;
use crate::funnel::calculate_dashboard_metrics;
use crate::insights::build_insights_data;
use crate::models::{SavedVideos, Video};
use crate::period::{FilterPeriod, PeriodWindow};
use crate::ranking::rank_videos;
use crate::report::generate_detailed_analysis;
use crate::table_display::{format_analytics, format_chart, format_dashboard, format_videos_table};
use crate::youtube_client::VideoClient;

const DEFAULT_BAR_WIDTH: usize = 40;

pub struct CommandContext {
    pub config: AppConfig,
    pub videos_file: Option<PathBuf>,
    pub now: NaiveDateTime,
    pub rng: StdRng,
}

/// Read a video list saved from the API, either the envelope or a bare array
pub fn load_videos_file(path: &Path) -> Result<Vec<Video>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read videos file {}", path.display()))?;
    let saved: SavedVideos = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse videos file {}", path.display()))?;
    Ok(saved.videos())
}

pub async fn load_videos(ctx: &CommandContext) -> Result<Vec<Video>> {
    let videos = match &ctx.videos_file {
        Some(path) => load_videos_file(path)?,
        None => VideoClient::from_config(&ctx.config).fetch_videos_or_empty().await,
    };

    info!("Loaded {} videos", videos.len());
    Ok(videos)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context("Failed to serialize JSON output")?;
    println!("{}", output);
    Ok(())
}

fn chart_bar_width() -> usize {
    match crossterm::terminal::size() {
        Ok((cols, _)) => (cols as usize).saturating_sub(30).clamp(10, 60),
        Err(_) => DEFAULT_BAR_WIDTH,
    }
}

/// Handle the funnel dashboard command
pub async fn handle_dashboard_command(ctx: &CommandContext, period: FilterPeriod, json: bool) -> Result<()> {
    let videos = load_videos(ctx).await?;
    let metrics = calculate_dashboard_metrics(&videos, period, ctx.now);
    let in_period = filter_videos_by_period(&videos, period, ctx.now).len();
    debug!("{} of {} videos fall in {}", in_period, videos.len(), period);

    if json {
        print_json(&json!({
            "period": period,
            "window": PeriodWindow::resolve(period, ctx.now),
            "videosInPeriod": in_period,
            "metrics": metrics,
            "uniqueViews": metrics.unique_views(),
            "products": metrics.product_breakdown(),
        }))?;
    } else {
        println!("{}", format_dashboard(&metrics, period));
    }

    Ok(())
}

/// Handle the views chart command
pub async fn handle_chart_command(ctx: &CommandContext, period: FilterPeriod, json: bool) -> Result<()> {
    let videos = load_videos(ctx).await?;
    let chart = get_chart_data(&videos, period, ctx.now);

    if json {
        print_json(&chart)?;
    } else {
        println!("{}", format_chart(&chart, period, chart_bar_width()));
    }

    Ok(())
}

/// Handle the ranked videos command
pub async fn handle_videos_command(ctx: &mut CommandContext, period: FilterPeriod, json: bool) -> Result<()> {
    let videos = load_videos(ctx).await?;
    let ranked = rank_videos(&videos, period, ctx.now, &mut ctx.rng);

    if json {
        print_json(&ranked)?;
    } else {
        println!("{}", format_videos_table(&ranked, period));
    }

    Ok(())
}

/// Handle the analytics cards command
pub async fn handle_analytics_command(ctx: &mut CommandContext, period: FilterPeriod, json: bool) -> Result<()> {
    let videos = load_videos(ctx).await?;
    let analytics = build_analytics(&videos, period, ctx.now, &mut ctx.rng);

    if json {
        print_json(&analytics)?;
    } else {
        println!("{}", format_analytics(&analytics));
    }

    Ok(())
}

/// Handle the insights command
pub async fn handle_insights_command(
    ctx: &mut CommandContext,
    period: FilterPeriod,
    json: bool,
    no_ai: bool,
    snapshot: bool,
) -> Result<()> {
    let videos = load_videos(ctx).await?;
    let data = build_insights_data(&videos, period, ctx.now, &mut ctx.rng);

    if snapshot {
        return print_json(&data);
    }

    let insights = if no_ai {
        generate_detailed_analysis(&data)
    } else {
        let client = InsightsClient::from_config(&ctx.config);
        generate_ai_insights(client.as_ref(), &data).await
    };

    if json {
        print_json(&json!({
            "period": period,
            "insights": insights,
        }))?;
    } else {
        println!("{}", insights);
    }

    Ok(())
}
