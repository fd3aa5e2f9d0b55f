use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};

use vireo_model::{
    CommentId, CommentPublic, CommentReaction, HistoryEntry, UserId, UserPublic, VideoId,
    VideoMeta, VideoReaction, VideoSummary,
};

use crate::db::is_foreign_key_violation;
use crate::error::{CoreError, Result};

/// Likes, comments, reactions, and watch history.
#[derive(Clone, Debug)]
pub struct SocialRepository {
    pool: PgPool,
}

impl SocialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns `false` when the like already existed.
    pub async fn like(&self, user: UserId, video: VideoId) -> Result<bool> {
        let result = sqlx::query(
            "INSERT INTO likes (user_id, video_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user.as_uuid())
        .bind(video.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(not_found_on_fk("video"))?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn unlike(&self, user: UserId, video: VideoId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM likes WHERE user_id = $1 AND video_id = $2")
            .bind(user.as_uuid())
            .bind(video.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Like/comment counters plus the viewer's own reaction, or `None` for
    /// an unknown video.
    pub async fn video_meta(&self, video: VideoId, viewer: Option<UserId>) -> Result<Option<VideoMeta>> {
        let viewer = viewer.map(|id| id.to_uuid());
        let row = sqlx::query(
            r#"
            SELECT EXISTS(SELECT 1 FROM videos WHERE id = $1) AS present,
                   (SELECT count(*) FROM likes WHERE video_id = $1) AS likes,
                   (SELECT count(*) FROM comments WHERE video_id = $1) AS comments,
                   EXISTS(SELECT 1 FROM likes WHERE video_id = $1 AND user_id = $2) AS viewer_liked
            "#,
        )
        .bind(video.as_uuid())
        .bind(viewer)
        .fetch_one(&self.pool)
        .await?;

        if !row.try_get::<bool, _>("present")? {
            return Ok(None);
        }
        Ok(Some(VideoMeta {
            likes: row.try_get("likes")?,
            comments: row.try_get("comments")?,
            current_user: viewer.map(|_| {
                Ok::<_, CoreError>(VideoReaction {
                    liked: row.try_get("viewer_liked")?,
                })
            })
            .transpose()?,
        }))
    }

    pub async fn comments(&self, video: VideoId, viewer: Option<UserId>) -> Result<Vec<CommentPublic>> {
        let viewer = viewer.map(|id| id.to_uuid());
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.text, c.img_url, c.created_at,
                   u.id AS author_id, u.name AS author_name,
                   u.avatar_url AS author_avatar_url,
                   count(*) FILTER (WHERE r.liked) AS likes,
                   count(*) FILTER (WHERE NOT r.liked) AS dislikes,
                   bool_or(r.user_id = $2 AND r.liked) AS viewer_liked,
                   bool_or(r.user_id = $2 AND NOT r.liked) AS viewer_disliked
            FROM comments c
            JOIN users u ON u.id = c.author_id
            LEFT JOIN comment_reactions r ON r.comment_id = c.id
            WHERE c.video_id = $1
            GROUP BY c.id, u.id
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(video.as_uuid())
        .bind(viewer)
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| decode_comment(row, viewer.is_some()))
            .collect()
    }

    pub async fn insert_comment(
        &self,
        video: VideoId,
        author: UserId,
        text: &str,
        img_url: Option<&str>,
    ) -> Result<CommentId> {
        let id = CommentId::new();
        sqlx::query(
            r#"
            INSERT INTO comments (id, video_id, author_id, text, img_url)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(id.as_uuid())
        .bind(video.as_uuid())
        .bind(author.as_uuid())
        .bind(text)
        .bind(img_url)
        .execute(&self.pool)
        .await
        .map_err(not_found_on_fk("video"))?;
        Ok(id)
    }

    /// Delete a comment the given user authored. Returns `false` when the
    /// comment does not exist or belongs to someone else.
    pub async fn delete_comment(&self, comment: CommentId, author: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1 AND author_id = $2")
            .bind(comment.as_uuid())
            .bind(author.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn set_comment_reaction(
        &self,
        comment: CommentId,
        user: UserId,
        liked: bool,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO comment_reactions (comment_id, user_id, liked)
            VALUES ($1, $2, $3)
            ON CONFLICT (comment_id, user_id) DO UPDATE SET liked = EXCLUDED.liked
            "#,
        )
        .bind(comment.as_uuid())
        .bind(user.as_uuid())
        .bind(liked)
        .execute(&self.pool)
        .await
        .map_err(not_found_on_fk("comment"))?;
        Ok(())
    }

    pub async fn clear_comment_reaction(&self, comment: CommentId, user: UserId) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM comment_reactions WHERE comment_id = $1 AND user_id = $2")
                .bind(comment.as_uuid())
                .bind(user.as_uuid())
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// First view creates the row; replays only refresh `viewed_at`.
    pub async fn upsert_history(&self, user: UserId, video: VideoId) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO watch_history (user_id, video_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, video_id) DO UPDATE SET viewed_at = now()
            "#,
        )
        .bind(user.as_uuid())
        .bind(video.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(not_found_on_fk("video"))?;
        Ok(())
    }

    pub async fn history(&self, user: UserId, limit: i64) -> Result<Vec<HistoryEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT h.viewed_at, v.id, v.title, v.media_url, v.cover_url
            FROM watch_history h
            JOIN videos v ON v.id = h.video_id
            WHERE h.user_id = $1
            ORDER BY h.viewed_at DESC
            LIMIT $2
            "#,
        )
        .bind(user.as_uuid())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| {
                Ok(HistoryEntry {
                    video: VideoSummary {
                        id: VideoId(row.try_get("id")?),
                        title: row.try_get("title")?,
                        media_url: row.try_get("media_url")?,
                        cover_url: row.try_get("cover_url")?,
                    },
                    viewed_at: row.try_get("viewed_at")?,
                })
            })
            .collect()
    }

    pub async fn delete_history(&self, user: UserId, video: VideoId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM watch_history WHERE user_id = $1 AND video_id = $2")
            .bind(user.as_uuid())
            .bind(video.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn not_found_on_fk(entity: &'static str) -> impl Fn(sqlx::Error) -> CoreError {
    move |err| {
        if is_foreign_key_violation(&err) {
            CoreError::NotFound(entity)
        } else {
            err.into()
        }
    }
}

fn decode_comment(row: &PgRow, has_viewer: bool) -> Result<CommentPublic> {
    let current_user = if has_viewer {
        Some(CommentReaction {
            liked: row.try_get::<Option<bool>, _>("viewer_liked")?.unwrap_or(false),
            disliked: row
                .try_get::<Option<bool>, _>("viewer_disliked")?
                .unwrap_or(false),
        })
    } else {
        None
    };
    Ok(CommentPublic {
        id: CommentId(row.try_get("id")?),
        text: row.try_get("text")?,
        img_url: row.try_get("img_url")?,
        author: UserPublic {
            id: UserId(row.try_get("author_id")?),
            name: row.try_get("author_name")?,
            avatar_url: row.try_get("author_avatar_url")?,
        },
        created_at: row.try_get("created_at")?,
        likes: row.try_get("likes")?,
        dislikes: row.try_get("dislikes")?,
        current_user,
    })
}
