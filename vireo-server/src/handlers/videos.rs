use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vireo_core::db::NewVideo;
use vireo_core::search::VideoDoc;
use vireo_model::{VideoDetailed, VideoId, VideoMeta};

use crate::errors::{AppError, AppResult};
use crate::extract::{CurrentUser, OptionalUser};
use crate::state::AppState;

const MAX_TITLE_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 1000;
const SEARCH_RESULT_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct CreateVideoRequest {
    pub title: String,
    pub description: String,
    /// Object keys from previously issued upload tickets.
    pub video_key: String,
    pub cover_key: String,
    pub tags: Vec<String>,
    pub category: String,
}

#[derive(Debug, Serialize)]
pub struct CreateVideoResponse {
    pub id: VideoId,
}

/// Publish an uploaded video: persist it, then register it with the search
/// index and the recommender.
pub async fn create_video_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateVideoRequest>,
) -> AppResult<(StatusCode, Json<CreateVideoResponse>)> {
    validate_create(&request)?;

    let video = NewVideo {
        id: VideoId::new(),
        title: request.title.clone(),
        description: request.description.clone(),
        media_url: state.uploads.public_url(&request.video_key),
        cover_url: state.uploads.public_url(&request.cover_key),
        author: user,
        tags: request.tags.clone(),
    };
    state.db.videos().insert(&video).await?;

    state
        .search
        .index_video(
            video.id,
            &VideoDoc {
                title: request.title,
                description: request.description,
                tags: request.tags.clone(),
            },
        )
        .await?;

    // The category leads the tag list so the recommender can treat it as
    // the primary grouping.
    let mut categories = vec![request.category];
    categories.extend(request.tags);
    state.recommender.insert_video(video.id, categories).await?;

    Ok((StatusCode::CREATED, Json(CreateVideoResponse { id: video.id })))
}

fn validate_create(request: &CreateVideoRequest) -> AppResult<()> {
    if request.title.is_empty() || request.title.chars().count() > MAX_TITLE_LEN {
        return Err(AppError::bad_request("title must be 1-100 characters"));
    }
    if request.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(AppError::bad_request("description too long"));
    }
    if request.video_key.is_empty() || request.cover_key.is_empty() {
        return Err(AppError::bad_request("missing upload keys"));
    }
    if request.category.is_empty() || request.tags.iter().any(|tag| tag.is_empty()) {
        return Err(AppError::bad_request("empty tag or category"));
    }
    Ok(())
}

pub async fn get_video_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<VideoDetailed>> {
    let video = state
        .db
        .videos()
        .fetch_detailed(VideoId(id))
        .await?
        .ok_or_else(|| AppError::not_found("video not found"))?;
    Ok(Json(video))
}

/// Like/comment counters plus the viewer's own reaction when a session is
/// present.
pub async fn video_meta_handler(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<VideoMeta>> {
    let meta = state
        .db
        .social()
        .video_meta(VideoId(id), viewer)
        .await?
        .ok_or_else(|| AppError::not_found("video not found"))?;
    Ok(Json(meta))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

pub async fn search_videos_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<VideoDetailed>>> {
    if params.q.is_empty() || params.q.chars().count() > 100 {
        return Err(AppError::bad_request("query must be 1-100 characters"));
    }
    let ids = state
        .search
        .search_videos(&params.q, SEARCH_RESULT_LIMIT)
        .await?;
    let videos = state.db.videos().fetch_detailed_many(&ids).await?;
    Ok(Json(videos))
}

/// Delete a video the caller owns, and scrub it from the search index and
/// recommender.
pub async fn delete_video_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let video = VideoId(id);
    if !state.db.videos().delete(video, user).await? {
        return Err(AppError::not_found("video not found"));
    }
    state.search.delete_video(video).await?;
    state.recommender.delete_video(video).await?;
    Ok(StatusCode::NO_CONTENT)
}
