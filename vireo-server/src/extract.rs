//! Session extractors.
//!
//! Sessions are opaque bearer tokens provisioned by the identity service;
//! handlers only care which user a token resolves to. `CurrentUser` rejects
//! unauthenticated requests, `OptionalUser` degrades to `None` so public
//! endpoints can still personalize when a session happens to be present.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use vireo_model::UserId;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub UserId);

#[derive(Debug, Clone, Copy)]
pub struct OptionalUser(pub Option<UserId>);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| AppError::unauthorized("missing bearer token"))?
            .to_string();
        let user = state
            .sessions
            .resolve(&token)
            .await?
            .ok_or_else(|| AppError::unauthorized("invalid or expired session"))?;
        Ok(CurrentUser(user))
    }
}

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts).map(str::to_string) else {
            return Ok(OptionalUser(None));
        };
        // An invalid token on a public endpoint reads as anonymous, not as
        // a rejection.
        Ok(OptionalUser(state.sessions.resolve(&token).await?))
    }
}
