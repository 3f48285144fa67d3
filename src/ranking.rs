//! # Video Ranking Module
//!
//! Ranks a channel's videos by simulated business impact
//!
//! ## Key Components
//! - [`RankedVideo`] - Video with metrics, score and 1-based rank
//! - [`rank_videos`] - Filter, score, sort and rank the top videos of a period

use chrono::NaiveDateTime;
use rand::Rng;
use serde::Serialize;
use std::cmp::Ordering;

use crate::aggregator::calculate_views_by_period;
use crate::models::Video;
use crate::period::FilterPeriod;
use crate::video_metrics::{VideoMetrics, calculate_video_metrics};

pub const TOP_VIDEO_LIMIT: usize = 10;
const PAGE_VISIT_WEIGHT: f64 = 0.4;
const REVENUE_WEIGHT: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedVideo {
    pub video: Video,
    pub metrics: VideoMetrics,
    pub ranking_score: f64,
    pub rank: usize,
}

pub fn ranking_score(metrics: &VideoMetrics) -> f64 {
    metrics.page_visits as f64 * PAGE_VISIT_WEIGHT + metrics.revenue as f64 * REVENUE_WEIGHT
}

/// Rank the period's videos.
///
/// Videos without views inside the period are dropped, the ten most viewed
/// are kept, then ordered by ranking score. Ties in either sort fall back
/// to `video_id` so the order never depends on input order.
pub fn rank_videos<R: Rng + ?Sized>(
    videos: &[Video],
    period: FilterPeriod,
    now: NaiveDateTime,
    rng: &mut R,
) -> Vec<RankedVideo> {
    let mut candidates: Vec<(&Video, VideoMetrics)> = videos
        .iter()
        .filter(|video| calculate_views_by_period(std::slice::from_ref(*video), period, now) > 0)
        .map(|video| (video, calculate_video_metrics(video, rng)))
        .collect();

    candidates.sort_by(|(a, _), (b, _)| {
        b.view_count
            .cmp(&a.view_count)
            .then_with(|| a.video_id.cmp(&b.video_id))
    });
    candidates.truncate(TOP_VIDEO_LIMIT);

    let mut ranked: Vec<RankedVideo> = candidates
        .into_iter()
        .map(|(video, metrics)| RankedVideo {
            ranking_score: ranking_score(&metrics),
            video: video.clone(),
            metrics,
            rank: 0,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.ranking_score
            .partial_cmp(&a.ranking_score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.video.video_id.cmp(&b.video.video_id))
    });

    for (index, entry) in ranked.iter_mut().enumerate() {
        entry.rank = index + 1;
    }

    ranked
}
