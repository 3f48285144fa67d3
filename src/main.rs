//! # Funnel Insights
//!
//! YouTube-to-revenue funnel metrics, video rankings and business insights
//!
//! ## Key Components
//! - [`cli::Args`] - Command-line surface
//! - [`commands`] - Command handlers
//! - [`insights::build_insights_data`] - Snapshot behind the insights report

mod aggregator;
mod ai_client;
mod analytics;
mod cli;
mod commands;
mod config;
mod error;
mod funnel;
mod insights;
mod models;
mod period;
mod ranking;
mod relative_time;
mod report;
mod table_display;
mod video_metrics;
mod youtube_client;

use anyhow::Result;
use chrono::{Local, NaiveDateTime, Utc};
use clap::Parser;
use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::cli::{Args, Commands};
use crate::commands::{
    CommandContext, handle_analytics_command, handle_chart_command, handle_dashboard_command,
    handle_insights_command, handle_videos_command,
};
use crate::config::{AppConfig, parse_timezone, validate_config};
use crate::period::FilterPeriod;

/// Wall-clock time in the requested zone, or the system zone
fn current_time(timezone: Option<&str>) -> Result<NaiveDateTime> {
    match timezone {
        Some(name) => Ok(Utc::now().with_timezone(&parse_timezone(name)?).naive_local()),
        None => Ok(Local::now().naive_local()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger based on debug flag
    let default_filter = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = AppConfig::load()?;
    validate_config(&config, args.timezone.as_deref())?;

    let now = current_time(args.timezone.as_deref())?;
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    debug!("Running at {} (seed: {:?})", now, args.seed);

    let mut ctx = CommandContext {
        config,
        videos_file: args.videos_file,
        now,
        rng,
    };

    match args.command {
        Some(Commands::Dashboard { period, json }) => {
            handle_dashboard_command(&ctx, FilterPeriod::parse_lossy(&period), json).await
        }
        Some(Commands::Chart { period, json }) => {
            handle_chart_command(&ctx, FilterPeriod::parse_lossy(&period), json).await
        }
        Some(Commands::Videos { period, json }) => {
            handle_videos_command(&mut ctx, FilterPeriod::parse_lossy(&period), json).await
        }
        Some(Commands::Analytics { period, json }) => {
            handle_analytics_command(&mut ctx, FilterPeriod::parse_lossy(&period), json).await
        }
        Some(Commands::Insights {
            period,
            json,
            no_ai,
            snapshot,
        }) => {
            handle_insights_command(&mut ctx, FilterPeriod::parse_lossy(&period), json, no_ai, snapshot).await
        }
        None => {
            // Default to the dashboard when no subcommand is provided
            handle_dashboard_command(&ctx, FilterPeriod::default(), false).await
        }
    }
}
