use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use vireo_core::CoreError;
use vireo_model::ModelError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound(entity) => Self::not_found(format!("{entity} not found")),
            CoreError::Forbidden(msg) => Self::forbidden(msg),
            CoreError::Conflict(msg) => Self::conflict(msg),
            CoreError::Validation(msg) => Self::bad_request(msg),
            CoreError::Upstream(err) => {
                tracing::error!(error = %err, "upstream request failed");
                Self::bad_gateway("upstream service unavailable")
            }
            CoreError::UpstreamFormat(msg) => {
                tracing::error!(error = %msg, "upstream returned unexpected response");
                Self::bad_gateway("upstream service unavailable")
            }
            CoreError::Database(err) => {
                tracing::error!(error = %err, "database error");
                Self::internal("database error")
            }
            CoreError::Session(err) => {
                tracing::error!(error = %err, "session store error");
                Self::internal("session store error")
            }
            CoreError::PasswordHash => Self::internal("password hashing failed"),
        }
    }
}

impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        Self::bad_request(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_expected_statuses() {
        let cases: Vec<(CoreError, StatusCode)> = vec![
            (CoreError::NotFound("video"), StatusCode::NOT_FOUND),
            (
                CoreError::Conflict("email already registered".into()),
                StatusCode::CONFLICT,
            ),
            (
                CoreError::Validation("title too long".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                CoreError::UpstreamFormat("bad payload".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (CoreError::Forbidden("not yours"), StatusCode::FORBIDDEN),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(err).status, status);
        }
    }

    #[test]
    fn model_errors_are_client_errors() {
        assert_eq!(
            AppError::from(ModelError::InvalidCursor).status,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn not_found_mentions_the_entity() {
        let err = AppError::from(CoreError::NotFound("video"));
        assert_eq!(err.message, "video not found");
    }
}
