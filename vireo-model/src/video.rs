use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::VideoId;
use crate::user::UserPublic;

/// The minimal video surface a feed needs: identity plus display attributes.
///
/// Summaries are immutable once they enter a feed window; anything that can
/// change (counts, reactions) lives in [`VideoMeta`] and is fetched on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSummary {
    pub id: VideoId,
    pub title: String,
    /// Direct playback URL on the object-storage CDN.
    pub media_url: String,
    pub cover_url: String,
}

/// Full video representation returned by feed and detail endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDetailed {
    pub id: VideoId,
    pub title: String,
    pub description: String,
    pub media_url: String,
    pub cover_url: String,
    pub author: UserPublic,
    pub tags: Vec<String>,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}

impl VideoDetailed {
    pub fn summary(&self) -> VideoSummary {
        VideoSummary {
            id: self.id,
            title: self.title.clone(),
            media_url: self.media_url.clone(),
            cover_url: self.cover_url.clone(),
        }
    }
}

impl From<VideoDetailed> for VideoSummary {
    fn from(video: VideoDetailed) -> Self {
        video.summary()
    }
}

/// Mutable per-video counters and the current user's reactions, if known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMeta {
    pub likes: i64,
    pub comments: i64,
    pub current_user: Option<VideoReaction>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VideoReaction {
    pub liked: bool,
}

/// Anything that can sit in a feed window.
///
/// The feed engine only ever needs identity; it deliberately does not care
/// whether it holds summaries or fully hydrated videos.
pub trait VideoLike {
    fn video_id(&self) -> VideoId;
}

impl VideoLike for VideoSummary {
    fn video_id(&self) -> VideoId {
        self.id
    }
}

impl VideoLike for VideoDetailed {
    fn video_id(&self) -> VideoId {
        self.id
    }
}
