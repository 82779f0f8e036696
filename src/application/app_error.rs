use thiserror::Error;
use webconfig_types::{ApiErrorBody, ErrorCode};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found")]
    NotFound,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::NotFound => ErrorCode::NotFound,
            AppError::Forbidden(_) => ErrorCode::Forbidden,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::Unavailable(_) => ErrorCode::ServiceUnavailable,
            AppError::Serialization(_) | AppError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl From<ApiErrorBody> for AppError {
    fn from(body: ApiErrorBody) -> Self {
        match body.code {
            ErrorCode::InvalidInput => AppError::InvalidInput(body.message),
            ErrorCode::NotFound => AppError::NotFound,
            ErrorCode::Forbidden => AppError::Forbidden(body.message),
            ErrorCode::Conflict => AppError::Conflict(body.message),
            ErrorCode::ServiceUnavailable => AppError::Unavailable(body.message),
            ErrorCode::InternalError => AppError::Internal(body.message),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
