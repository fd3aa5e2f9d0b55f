use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vireo_core::db::NewUser;
use vireo_core::password::hash_password;
use vireo_core::search::UserDoc;
use vireo_model::{HistoryEntry, UserId, UserPublic, VideoId, VideoSummary};

use crate::errors::{AppError, AppResult};
use crate::extract::CurrentUser;
use crate::state::AppState;

const MAX_NAME_LEN: usize = 32;
const MAX_EMAIL_LEN: usize = 64;
const MAX_PASSWORD_LEN: usize = 32;
const USER_SEARCH_LIMIT: usize = 10;
const HISTORY_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub bio: String,
    pub avatar_key: Option<String>,
}

pub async fn register_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserPublic>)> {
    validate_register(&request)?;

    let user = NewUser {
        id: UserId::new(),
        name: request.name.clone(),
        email: request.email.clone(),
        password_hash: hash_password(&request.password)?,
        bio: request.bio.clone(),
        avatar_url: request
            .avatar_key
            .as_deref()
            .map(|key| state.uploads.public_url(key)),
    };
    state.db.users().insert(&user).await?;

    state
        .search
        .index_user(
            user.id,
            &UserDoc {
                name: request.name.clone(),
                bio: request.bio,
            },
        )
        .await?;

    let public = UserPublic {
        id: user.id,
        name: user.name,
        avatar_url: user.avatar_url,
    };
    Ok((StatusCode::CREATED, Json(public)))
}

fn validate_register(request: &RegisterRequest) -> AppResult<()> {
    if request.name.is_empty() || request.name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::bad_request("name must be 1-32 characters"));
    }
    let email = &request.email;
    if email.is_empty()
        || email.chars().count() > MAX_EMAIL_LEN
        || !email.contains('@')
        || email.contains(char::is_whitespace)
    {
        return Err(AppError::bad_request("invalid email address"));
    }
    if request.password.is_empty() || request.password.chars().count() > MAX_PASSWORD_LEN {
        return Err(AppError::bad_request("password must be 1-32 characters"));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub bio: String,
    pub avatar_url: Option<String>,
}

pub async fn current_user_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<MeResponse>> {
    let user = state
        .db
        .users()
        .fetch(user)
        .await?
        .ok_or_else(|| AppError::not_found("user not found"))?;
    Ok(Json(MeResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        bio: user.bio,
        avatar_url: user.avatar_url,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub bio: String,
    /// Object key of a freshly uploaded avatar; absent leaves the current
    /// avatar in place.
    pub avatar_key: Option<String>,
}

pub async fn update_profile_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdateProfileRequest>,
) -> AppResult<StatusCode> {
    if request.name.is_empty() || request.name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::bad_request("name must be 1-32 characters"));
    }
    let avatar_url = request
        .avatar_key
        .as_deref()
        .map(|key| state.uploads.public_url(key));
    if !state
        .db
        .users()
        .update_profile(user, &request.name, &request.bio, avatar_url.as_deref())
        .await?
    {
        return Err(AppError::not_found("user not found"));
    }

    state
        .search
        .index_user(
            user,
            &UserDoc {
                name: request.name,
                bio: request.bio,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct UserSearchQuery {
    pub q: String,
}

pub async fn search_users_handler(
    State(state): State<AppState>,
    Query(params): Query<UserSearchQuery>,
) -> AppResult<Json<Vec<UserPublic>>> {
    if params.q.is_empty() || params.q.chars().count() > 100 {
        return Err(AppError::bad_request("query must be 1-100 characters"));
    }
    let ids = state.search.search_users(&params.q, USER_SEARCH_LIMIT).await?;
    let users = state.db.users().fetch_public_many(&ids).await?;
    Ok(Json(users))
}

pub async fn liked_videos_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<VideoSummary>>> {
    Ok(Json(state.db.videos().liked_by(user).await?))
}

pub async fn history_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    Ok(Json(state.db.social().history(user, HISTORY_LIMIT).await?))
}

pub async fn delete_history_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(video): Path<Uuid>,
) -> AppResult<StatusCode> {
    if !state
        .db
        .social()
        .delete_history(user, VideoId(video))
        .await?
    {
        return Err(AppError::not_found("history entry not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}
