use std::collections::HashMap;

use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;

use vireo_model::{UserId, UserPublic, VideoDetailed, VideoId, VideoSummary};

use crate::error::Result;

/// Insert payload for a freshly uploaded video.
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub id: VideoId,
    pub title: String,
    pub description: String,
    pub media_url: String,
    pub cover_url: String,
    pub author: UserId,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct VideoRepository {
    pool: PgPool,
}

const DETAILED_SELECT: &str = r#"
    SELECT v.id, v.title, v.description, v.media_url, v.cover_url,
           v.views, v.created_at,
           u.id AS author_id, u.name AS author_name,
           u.avatar_url AS author_avatar_url,
           array_remove(array_agg(t.tag), NULL) AS tags
    FROM videos v
    JOIN users u ON u.id = v.author_id
    LEFT JOIN video_tags t ON t.video_id = v.id
"#;

impl VideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, video: &NewVideo) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO videos (id, title, description, media_url, cover_url, author_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(video.id.as_uuid())
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.media_url)
        .bind(&video.cover_url)
        .bind(video.author.as_uuid())
        .execute(&mut *tx)
        .await?;

        for tag in &video.tags {
            sqlx::query(
                "INSERT INTO video_tags (video_id, tag) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(video.id.as_uuid())
            .bind(tag)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn fetch_detailed(&self, id: VideoId) -> Result<Option<VideoDetailed>> {
        let row = sqlx::query(&format!(
            "{DETAILED_SELECT} WHERE v.id = $1 GROUP BY v.id, u.id"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| decode_detailed(&row)).transpose()
    }

    /// Hydrate many videos at once, preserving the caller's id order.
    ///
    /// Ids with no backing row (deleted since ranked) are silently dropped.
    pub async fn fetch_detailed_many(&self, ids: &[VideoId]) -> Result<Vec<VideoDetailed>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<uuid::Uuid> = ids.iter().map(VideoId::to_uuid).collect();
        let rows = sqlx::query(&format!(
            "{DETAILED_SELECT} WHERE v.id = ANY($1) GROUP BY v.id, u.id"
        ))
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_id: HashMap<VideoId, VideoDetailed> = rows
            .iter()
            .map(|row| decode_detailed(row).map(|video| (video.id, video)))
            .collect::<Result<_>>()?;
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    /// Delete a video the given user owns. Returns `false` when the video
    /// does not exist or belongs to someone else.
    pub async fn delete(&self, id: VideoId, author: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1 AND author_id = $2")
            .bind(id.as_uuid())
            .bind(author.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn liked_by(&self, user: UserId) -> Result<Vec<VideoSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT v.id, v.title, v.media_url, v.cover_url
            FROM videos v
            JOIN likes l ON l.video_id = v.id
            WHERE l.user_id = $1
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(user.as_uuid())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(decode_summary).collect()
    }

    /// Bump the denormalized view counter. Called when a view "starts"
    /// (one second of actual playback), not on page load.
    pub async fn record_view(&self, id: VideoId) -> Result<()> {
        sqlx::query("UPDATE videos SET views = views + 1 WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

fn decode_summary(row: &PgRow) -> Result<VideoSummary> {
    Ok(VideoSummary {
        id: VideoId(row.try_get("id")?),
        title: row.try_get("title")?,
        media_url: row.try_get("media_url")?,
        cover_url: row.try_get("cover_url")?,
    })
}

fn decode_detailed(row: &PgRow) -> Result<VideoDetailed> {
    Ok(VideoDetailed {
        id: VideoId(row.try_get("id")?),
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        media_url: row.try_get("media_url")?,
        cover_url: row.try_get("cover_url")?,
        author: UserPublic {
            id: UserId(row.try_get("author_id")?),
            name: row.try_get("author_name")?,
            avatar_url: row.try_get("author_avatar_url")?,
        },
        tags: row.try_get("tags")?,
        views: row.try_get("views")?,
        created_at: row.try_get("created_at")?,
    })
}
