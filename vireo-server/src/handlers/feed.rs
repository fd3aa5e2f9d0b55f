use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;

use vireo_model::{FeedCursor, FeedPage};

use crate::errors::AppResult;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// Default page size; matches the client's feed window.
const DEFAULT_LIMIT: usize = 5;
const MAX_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub cursor: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// One page of the personalized feed.
///
/// The recommender returns ranked video ids; rows are hydrated from
/// Postgres preserving that order. Ids the recommender still knows but the
/// database no longer has (deleted videos) drop out of the page silently;
/// the cursor still advances past them. An empty page with no further
/// candidates ends the feed (`next_cursor: null`).
pub async fn feed_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(params): Query<FeedQuery>,
) -> AppResult<Json<FeedPage>> {
    let limit = params.limit.clamp(1, MAX_LIMIT);
    let offset = match &params.cursor {
        Some(raw) => FeedCursor::from(raw.clone()).offset()?,
        None => 0,
    };

    let ids = state.recommender.recommend(user, limit, offset).await?;
    let videos = state.db.videos().fetch_detailed_many(&ids).await?;

    let next_cursor = (!ids.is_empty()).then(|| FeedCursor::from_offset(offset + ids.len() as u64));
    Ok(Json(FeedPage { videos, next_cursor }))
}
