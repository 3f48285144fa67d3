//! # Video Model Module
//!
//! Defines the video records returned by the channel listing API
//!
//! ## Key Components
//! - [`Video`] - A single channel video with its relative publish time
//! - [`Thumbnail`] - Thumbnail image reference
//! - [`VideoFeed`] - Accepted JSON shapes for an API response
//! - [`SavedVideos`] - Accepted JSON shapes for a video list saved to disk

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// A channel video as listed by the scraper API. Read-only for the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Relative time text, e.g. "14 years ago"
    #[serde(default)]
    pub published_at: String,
    /// Display length, e.g. "3:28"
    #[serde(default)]
    pub video_length: String,
    #[serde(default)]
    pub view_count: u64,
    #[serde(default)]
    pub thumbnail: Vec<Thumbnail>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChannelVideos {
    #[serde(default)]
    pub videos: Vec<Video>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChannelData {
    pub channel: Option<ChannelVideos>,
}

/// Video lists come either as the raw API envelope or as a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum VideoFeed {
    List(Vec<Video>),
    Envelope { data: Option<ChannelData> },
}

impl VideoFeed {
    pub fn videos(self) -> Vec<Video> {
        match self {
            VideoFeed::Envelope { data } => data
                .and_then(|d| d.channel)
                .map(|c| c.videos)
                .unwrap_or_default(),
            VideoFeed::List(videos) => videos,
        }
    }
}

/// Saved video files are a bare array or an envelope with a `data` key
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SavedVideos {
    List(Vec<Video>),
    Envelope { data: ChannelData },
}

impl SavedVideos {
    pub fn videos(self) -> Vec<Video> {
        match self {
            SavedVideos::Envelope { data } => data.channel.map(|c| c.videos).unwrap_or_default(),
            SavedVideos::List(videos) => videos,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_video(id: &str, published_at: &str, view_count: u64) -> Video {
    Video {
        video_id: id.to_string(),
        title: format!("Video {}", id),
        description: String::new(),
        published_at: published_at.to_string(),
        video_length: "10:00".to_string(),
        view_count,
        thumbnail: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_envelope() {
        let json = r#"{
            "status": "OK",
            "data": {
                "channel": {
                    "id": "UC1",
                    "cursor": null,
                    "videos": [{
                        "video_id": "abc",
                        "title": "How I closed 10 clients",
                        "description": "",
                        "published_at": "2 weeks ago",
                        "video_length": "12:01",
                        "view_count": 5400,
                        "thumbnail": [{"url": "https://i.ytimg.com/a.jpg", "width": 168, "height": 94}],
                        "moving_thumbnails": []
                    }]
                }
            }
        }"#;

        let videos = serde_json::from_str::<VideoFeed>(json).unwrap().videos();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].view_count, 5400);
        assert_eq!(videos[0].thumbnail[0].url, "https://i.ytimg.com/a.jpg");
    }

    #[test]
    fn test_feed_bare_list_and_missing_fields() {
        let json = r#"[{"video_id": "x"}, {"video_id": "y", "view_count": 12}]"#;
        let videos = serde_json::from_str::<VideoFeed>(json).unwrap().videos();
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].view_count, 0);
        assert_eq!(videos[0].published_at, "");
        assert_eq!(videos[1].view_count, 12);
    }

    #[test]
    fn test_feed_single_element_list() {
        let json = r#"[{"video_id": "solo", "view_count": 3}]"#;
        let videos = serde_json::from_str::<VideoFeed>(json).unwrap().videos();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].video_id, "solo");
    }

    #[test]
    fn test_feed_envelope_without_videos() {
        let json = r#"{"data": {"channel": null}}"#;
        assert!(serde_json::from_str::<VideoFeed>(json).unwrap().videos().is_empty());

        let json = r#"{"data": null}"#;
        assert!(serde_json::from_str::<VideoFeed>(json).unwrap().videos().is_empty());
    }

    #[test]
    fn test_saved_videos_require_data_key() {
        let json = r#"{"videos": [{"video_id": "a", "published_at": "1 day ago", "view_count": 500000}]}"#;
        assert!(serde_json::from_str::<SavedVideos>(json).is_err());
        assert!(serde_json::from_str::<VideoFeed>(json).unwrap().videos().is_empty());

        let json = r#"{"data": {"channel": {"videos": [{"video_id": "a"}]}}}"#;
        assert_eq!(serde_json::from_str::<SavedVideos>(json).unwrap().videos().len(), 1);
    }
}
