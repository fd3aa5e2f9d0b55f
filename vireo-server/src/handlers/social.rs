use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vireo_model::{CommentId, CommentPublic, FeedbackKind, VideoId};

use crate::errors::{AppError, AppResult};
use crate::extract::{CurrentUser, OptionalUser};
use crate::state::AppState;

const MAX_COMMENT_LEN: usize = 1000;

/// Like a video. Repeats are idempotent: only the first like reaches the
/// recommender.
pub async fn like_video_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let video = VideoId(id);
    if state.db.social().like(user, video).await? {
        state
            .recommender
            .insert_feedback(user, video, FeedbackKind::Liked)
            .await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unlike_video_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let video = VideoId(id);
    if state.db.social().unlike(user, video).await? {
        state
            .recommender
            .delete_feedback(user, video, FeedbackKind::Liked)
            .await?;
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_comments_handler(
    State(state): State<AppState>,
    OptionalUser(viewer): OptionalUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<CommentPublic>>> {
    let comments = state.db.social().comments(VideoId(id), viewer).await?;
    Ok(Json(comments))
}

#[derive(Debug, Deserialize)]
pub struct PostCommentRequest {
    pub text: String,
    pub img_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PostCommentResponse {
    pub id: CommentId,
}

pub async fn post_comment_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<PostCommentRequest>,
) -> AppResult<(StatusCode, Json<PostCommentResponse>)> {
    if request.text.is_empty() || request.text.chars().count() > MAX_COMMENT_LEN {
        return Err(AppError::bad_request("comment must be 1-1000 characters"));
    }
    let comment = state
        .db
        .social()
        .insert_comment(VideoId(id), user, &request.text, request.img_url.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(PostCommentResponse { id: comment })))
}

pub async fn delete_comment_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state.db.social().delete_comment(CommentId(id), user).await? {
        return Err(AppError::not_found("comment not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct CommentReactionRequest {
    pub liked: bool,
}

pub async fn set_comment_reaction_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
    Json(request): Json<CommentReactionRequest>,
) -> AppResult<StatusCode> {
    state
        .db
        .social()
        .set_comment_reaction(CommentId(id), user, request.liked)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_comment_reaction_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .db
        .social()
        .clear_comment_reaction(CommentId(id), user)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
