//! # YouTube Client Module
//!
//! Fetches the channel video list from the RapidAPI YouTube scraper
//!
//! ## Key Components
//! - [`VideoClient`] - HTTP client for the channel listing endpoint
//! - [`VideoClient::fetch_videos_or_empty`] - Fetch that degrades to an empty list

use log::{debug, error};

use crate::config::AppConfig;
use crate::error::ClientError;
use crate::models::{Video, VideoFeed};

const SERVICE: &str = "video API";

pub struct VideoClient {
    client: reqwest::Client,
    base_url: String,
    host: String,
    api_key: Option<String>,
    channel_id: String,
}

impl VideoClient {
    pub fn new(base_url: &str, host: &str, api_key: Option<String>, channel_id: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            host: host.to_string(),
            api_key,
            channel_id: channel_id.to_string(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.video_api_base_url,
            &config.rapid_api_host,
            config.rapid_api_key.clone(),
            &config.channel_id,
        )
    }

    /// List the channel's videos.
    ///
    /// An envelope without `data.channel.videos` yields an empty list.
    ///
    /// # Errors
    ///
    /// [`ClientError::MissingCredentials`] when no API key is configured,
    /// [`ClientError::Status`] on a non-2xx response, [`ClientError::Payload`]
    /// when the body is not a recognizable video list.
    pub async fn list_videos(&self) -> Result<Vec<Video>, ClientError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ClientError::MissingCredentials("RAPID_API_KEY"))?;

        let url = format!("{}/api/v1/channel/videos", self.base_url);
        debug!("Fetching videos for channel {} from {}", self.channel_id, url);

        let response = self
            .client
            .get(&url)
            .query(&[("channel_id", self.channel_id.as_str())])
            .header("x-rapidapi-key", api_key)
            .header("x-rapidapi-host", &self.host)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body,
            });
        }

        let feed: VideoFeed = serde_json::from_str(&body).map_err(|e| ClientError::Payload {
            service: SERVICE,
            message: e.to_string(),
        })?;

        let videos = feed.videos();
        debug!("Fetched {} videos", videos.len());
        Ok(videos)
    }

    /// Fetch videos, logging and swallowing any failure
    pub async fn fetch_videos_or_empty(&self) -> Vec<Video> {
        match self.list_videos().await {
            Ok(videos) => videos,
            Err(e) => {
                error!("Error fetching YouTube videos: {}", e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, key: Option<&str>) -> VideoClient {
        VideoClient::new(&server.uri(), "scraper.test", key.map(str::to_string), "UC123")
    }

    #[tokio::test]
    async fn test_list_videos_sends_rapidapi_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/channel/videos"))
            .and(query_param("channel_id", "UC123"))
            .and(header("x-rapidapi-key", "secret"))
            .and(header("x-rapidapi-host", "scraper.test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"channel": {"videos": [
                    {"video_id": "a", "title": "First", "published_at": "2 days ago", "view_count": 1200},
                    {"video_id": "b", "published_at": "1 month ago", "view_count": 300, "moving_thumbnails": []}
                ]}}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let videos = client_for(&server, Some("secret")).list_videos().await.unwrap();
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].title, "First");
        assert_eq!(videos[1].view_count, 300);
        assert_eq!(videos[1].title, "");
    }

    #[tokio::test]
    async fn test_missing_channel_yields_empty_list() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
            .mount(&server)
            .await;

        let videos = client_for(&server, Some("secret")).list_videos().await.unwrap();
        assert!(videos.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret"));
        let err = client.list_videos().await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status: 429, .. }), "got {err:?}");

        assert!(client.fetch_videos_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_is_payload_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server, Some("secret")).list_videos().await.unwrap_err();
        assert!(matches!(err, ClientError::Payload { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_missing_key_skips_the_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.list_videos().await.unwrap_err();
        assert!(matches!(err, ClientError::MissingCredentials("RAPID_API_KEY")));
        assert!(client.fetch_videos_or_empty().await.is_empty());
    }
}
