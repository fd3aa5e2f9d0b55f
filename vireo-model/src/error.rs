use thiserror::Error;

/// Errors produced by model constructors and validation routines.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid video: {0}")]
    InvalidVideo(String),

    #[error("invalid cursor")]
    InvalidCursor,

    #[error("unknown upload category: {0}")]
    UnknownUploadCategory(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
