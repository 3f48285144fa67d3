//! # CLI Module
//!
//! Command-line interface definitions and argument parsing for funnel-insights
//!
//! ## Key Components
//! - [`Args`] - Main CLI arguments structure
//! - [`Commands`] - Subcommand definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show funnel metrics for a period (default)
    Dashboard {
        /// Period: current_month, last_3_months, last_6_months, last_12_months
        #[arg(long, default_value = "current_month")]
        period: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show YouTube views bucketed by week or month
    Chart {
        /// Period: current_month, last_3_months, last_6_months, last_12_months
        #[arg(long, default_value = "current_month")]
        period: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Rank the period's top videos by simulated business impact
    Videos {
        /// Period: current_month, last_3_months, last_6_months, last_12_months
        #[arg(long, default_value = "current_month")]
        period: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show analytics cards with change badges and trends
    Analytics {
        /// Period: current_month, last_3_months, last_6_months, last_12_months
        #[arg(long, default_value = "current_month")]
        period: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Generate business insights for the period
    Insights {
        /// Period: current_month, last_3_months, last_6_months, last_12_months
        #[arg(long, default_value = "current_month")]
        period: String,

        /// Output in JSON format
        #[arg(long)]
        json: bool,

        /// Skip the Messages API and render the template report
        #[arg(long)]
        no_ai: bool,

        /// Print the insights snapshot instead of the narrative
        #[arg(long)]
        snapshot: bool,
    },
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Funnel Insights - YouTube-to-revenue funnel metrics and business insights"
)]
pub struct Args {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Read videos from a JSON file instead of the video API
    #[arg(long, global = true)]
    pub videos_file: Option<PathBuf>,

    /// Timezone used for "now" (defaults to the system zone)
    #[arg(long, global = true)]
    pub timezone: Option<String>,

    /// Seed for the simulated per-video metrics and comparisons
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
