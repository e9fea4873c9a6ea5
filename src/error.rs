use thiserror::Error;

use crate::api::ApiError;
use crate::transcription::SessionError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Platform API error: {0}")]
    Api(#[from] ApiError),

    #[error("Transcription session error: {0}")]
    Session(#[from] SessionError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type AppResult<T> = Result<T, AppError>;
