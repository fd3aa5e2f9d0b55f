//! View-feedback sink: the endpoints the client's progress tracker hits.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use uuid::Uuid;

use vireo_model::{FeedbackKind, VideoId};

use crate::errors::AppResult;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// The viewer watched at least one second: upsert watch history, bump the
/// view counter, and feed the engagement signal to the recommender.
pub async fn view_started_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let video = VideoId(id);
    state.db.social().upsert_history(user, video).await?;
    state.db.videos().record_view(video).await?;
    state
        .recommender
        .insert_feedback(user, video, FeedbackKind::Started)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The viewer got through 67% of the video: a stronger signal, recommender
/// only (history was already written at start).
pub async fn view_finished_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state
        .recommender
        .insert_feedback(user, VideoId(id), FeedbackKind::Finished)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
