use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::CommentId;
use crate::user::UserPublic;

/// Public comment projection with counts and the current user's reaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentPublic {
    pub id: CommentId,
    pub text: String,
    pub img_url: Option<String>,
    pub author: UserPublic,
    pub created_at: DateTime<Utc>,
    pub likes: i64,
    pub dislikes: i64,
    /// `None` when the request was unauthenticated.
    pub current_user: Option<CommentReaction>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CommentReaction {
    pub liked: bool,
    pub disliked: bool,
}
