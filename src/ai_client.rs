//! # AI Client Module
//!
//! Narrative insights from the Anthropic Messages API with a template fallback
//!
//! ## Key Components
//! - [`InsightsClient`] - Messages API client configured from the environment
//! - [`build_prompt`] - Analyst prompt rendered from an insights snapshot
//! - [`generate_ai_insights`] - Model text, or the fallback report when unavailable

use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use crate::config::AppConfig;
use crate::error::ClientError;
use crate::funnel::percent_of;
use crate::insights::InsightsData;
use crate::report::generate_detailed_analysis;

const SERVICE: &str = "Messages API";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

pub struct InsightsClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl InsightsClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, max_tokens: u32, temperature: f64) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}/v1/messages", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens,
            temperature,
        }
    }

    /// `None` when no API key is configured
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        config.anthropic_api_key.as_deref().map(|key| {
            Self::new(
                &config.anthropic_base_url,
                key,
                &config.anthropic_model,
                config.max_tokens,
                config.temperature,
            )
        })
    }

    /// Send one user message and return the text of the first content block
    pub async fn generate(&self, prompt: &str) -> Result<String, ClientError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!("Requesting insights from {} with model {}", self.url, self.model);
        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let parsed: MessagesResponse = response.json().await.map_err(|e| ClientError::Payload {
            service: SERVICE,
            message: e.to_string(),
        })?;

        match parsed.content.into_iter().next() {
            Some(ContentBlock { kind, text: Some(text) }) if kind == "text" => Ok(text),
            Some(block) => Err(ClientError::Payload {
                service: SERVICE,
                message: format!("first content block is '{}', expected text", block.kind),
            }),
            None => Err(ClientError::Payload {
                service: SERVICE,
                message: "response has no content".to_string(),
            }),
        }
    }
}

/// Analyst prompt listing the funnel, the top videos and the stage conversion rates
pub fn build_prompt(data: &InsightsData) -> String {
    let funnel = &data.funnel;
    let mut prompt = String::new();

    prompt.push_str(&format!(
        "You are an expert business analyst specializing in high-ticket coaching funnels. \
         Analyze the following data for {} and provide actionable insights.\n\n",
        data.period.context_phrase()
    ));
    prompt.push_str("CURRENT PERIOD DATA:\n");
    prompt.push_str(&format!("- YouTube Total Views: {}\n", data.youtube.total_views));
    prompt.push_str(&format!("- Unique Website Visitors: {}\n", funnel.website_visitors));
    prompt.push_str(&format!("- Calls Booked: {}\n", funnel.calls_booked));
    prompt.push_str(&format!("- Calls Accepted: {}\n", funnel.calls_accepted));
    prompt.push_str(&format!("- Show-ups: {}\n", funnel.show_ups));
    prompt.push_str(&format!("- Closes: {}\n", funnel.closes));
    prompt.push_str(&format!("- Revenue: ${}\n", funnel.total_revenue));
    prompt.push_str(&format!("  - PIF: ${}\n", data.kajabi.new_cash_collected.pif));
    prompt.push_str(&format!("  - Installments: ${}\n\n", data.kajabi.new_cash_collected.installments));

    prompt.push_str("TOP PERFORMING VIDEOS:\n");
    for (i, ranked) in data.youtube.top_videos.iter().enumerate() {
        prompt.push_str(&format!(
            "{}. \"{}\" - {} views, ${} revenue\n",
            i + 1,
            ranked.video.title,
            ranked.video.view_count,
            ranked.metrics.revenue
        ));
    }
    prompt.push('\n');

    prompt.push_str("CONVERSION RATES:\n");
    prompt.push_str(&format!(
        "- Views to Calls: {:.2}%\n",
        percent_of(funnel.calls_booked, data.youtube.total_views)
    ));
    prompt.push_str(&format!(
        "- Calls to Accepted: {:.2}%\n",
        percent_of(funnel.calls_accepted, funnel.calls_booked)
    ));
    prompt.push_str(&format!("- Show-up Rate: {:.2}%\n", funnel.show_up_rate));
    prompt.push_str(&format!("- Close Rate: {:.2}%\n\n", percent_of(funnel.closes, funnel.show_ups)));

    prompt.push_str("Please provide:\n");
    prompt.push_str("1. **Executive Summary** (2-3 sentences highlighting key performance)\n");
    prompt.push_str("2. **Key Wins** (what's working well, so the team can double down on it)\n");
    prompt.push_str("3. **Areas for Improvement** (specific bottlenecks or drop-offs)\n");
    prompt.push_str("4. **Video Performance Analysis** (which videos are driving results)\n");
    prompt.push_str("5. **Actionable Recommendations** (3-5 specific steps as an action plan to improve performance)\n\n");
    prompt.push_str("Don't use emojis so it stays professional, but keep it engaging.");

    prompt
}

/// Generate the insights text for a snapshot.
///
/// Never fails: without a client, or when the call errors, the deterministic
/// fallback report is returned instead.
pub async fn generate_ai_insights(client: Option<&InsightsClient>, data: &InsightsData) -> String {
    let Some(client) = client else {
        warn!("Anthropic API key not found, using fallback analysis");
        return generate_detailed_analysis(data);
    };

    match client.generate(&build_prompt(data)).await {
        Ok(text) => text,
        Err(e) => {
            error!("Error generating AI insights: {}", e);
            info!("Falling back to manual analysis");
            generate_detailed_analysis(data)
        }
    }
}
