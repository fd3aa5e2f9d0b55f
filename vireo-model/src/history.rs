use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::video::VideoSummary;

/// One watch-history row: which video, when last viewed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub video: VideoSummary,
    pub viewed_at: DateTime<Utc>,
}
