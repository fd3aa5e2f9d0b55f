//! Frequently used model types for downstream crates.

pub use crate::comment::{CommentPublic, CommentReaction};
pub use crate::error::{ModelError, Result as ModelResult};
pub use crate::feed::{FeedCursor, FeedPage};
pub use crate::feedback::FeedbackKind;
pub use crate::history::HistoryEntry;
pub use crate::ids::{CommentId, UserId, VideoId};
pub use crate::upload::{UploadCategory, UploadTicket};
pub use crate::user::{User, UserPublic};
pub use crate::video::{VideoDetailed, VideoLike, VideoMeta, VideoReaction, VideoSummary};
