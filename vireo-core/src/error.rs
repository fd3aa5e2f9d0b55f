use thiserror::Error;

/// Errors produced by repositories and service clients.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("session store error: {0}")]
    Session(#[from] redis::RedisError),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("unexpected upstream response: {0}")]
    UpstreamFormat(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("password hashing failed")]
    PasswordHash,
}

pub type Result<T> = std::result::Result<T, CoreError>;
