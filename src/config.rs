//! # Config Module
//!
//! Environment-driven configuration for the video source and the insights generator
//!
//! ## Key Components
//! - [`AppConfig`] - Credentials, endpoints and generation settings
//! - [`validate_config`] - Range checks run before any command
//! - [`parse_timezone`] - Resolve an IANA zone name

use anyhow::{Context, Result, bail};
use chrono_tz::Tz;
use log::debug;
use std::env;
use std::str::FromStr;

pub const DEFAULT_RAPID_API_HOST: &str = "youtube-scraper3.p.rapidapi.com";
pub const DEFAULT_VIDEO_API_BASE_URL: &str = "https://youtube-scraper3.p.rapidapi.com";
pub const DEFAULT_CHANNEL_ID: &str = "UCjEXry5mjyhACMxTxCu7VWg";
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub rapid_api_key: Option<String>,
    pub rapid_api_host: String,
    pub video_api_base_url: String,
    pub channel_id: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_base_url: String,
    pub anthropic_model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rapid_api_key: None,
            rapid_api_host: DEFAULT_RAPID_API_HOST.to_string(),
            video_api_base_url: DEFAULT_VIDEO_API_BASE_URL.to_string(),
            channel_id: DEFAULT_CHANNEL_ID.to_string(),
            anthropic_api_key: None,
            anthropic_base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl AppConfig {
    /// Load `.env` files, then read the process environment
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            debug!("Loaded environment from {}", path.display());
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_env = config_dir.join("funnel-insights").join(".env");
            if user_env.exists() {
                dotenvy::from_path(&user_env)
                    .with_context(|| format!("Failed to read {}", user_env.display()))?;
                debug!("Loaded environment from {}", user_env.display());
            }
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let max_tokens = match get("INSIGHTS_MAX_TOKENS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("INSIGHTS_MAX_TOKENS must be a positive integer, got '{}'", raw))?,
            None => defaults.max_tokens,
        };
        let temperature = match get("INSIGHTS_TEMPERATURE") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("INSIGHTS_TEMPERATURE must be a number, got '{}'", raw))?,
            None => defaults.temperature,
        };

        Ok(Self {
            rapid_api_key: get("RAPID_API_KEY"),
            rapid_api_host: get("RAPID_API_HOST").unwrap_or(defaults.rapid_api_host),
            video_api_base_url: get("VIDEO_API_BASE_URL").unwrap_or(defaults.video_api_base_url),
            channel_id: get("YOUTUBE_CHANNEL_ID").unwrap_or(defaults.channel_id),
            anthropic_api_key: get("ANTHROPIC_API_KEY"),
            anthropic_base_url: get("ANTHROPIC_BASE_URL").unwrap_or(defaults.anthropic_base_url),
            anthropic_model: get("ANTHROPIC_MODEL").unwrap_or(defaults.anthropic_model),
            max_tokens,
            temperature,
        })
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    Tz::from_str(name).map_err(|_| anyhow::anyhow!("Invalid timezone: {}", name))
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig, timezone: Option<&str>) -> Result<()> {
    if !(0.0..=1.0).contains(&config.temperature) {
        bail!("INSIGHTS_TEMPERATURE must be between 0.0 and 1.0, got {}", config.temperature);
    }

    if config.max_tokens == 0 {
        bail!("INSIGHTS_MAX_TOKENS must be greater than zero");
    }

    if let Some(tz) = timezone {
        parse_timezone(tz)?;
    }

    Ok(())
}
