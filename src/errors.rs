use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid section schema: {0}")]
    InvalidSchema(String),

    #[error("Generation provider rate limited the request")]
    UpstreamRateLimited,

    #[error("Generation provider quota exhausted")]
    UpstreamQuotaExhausted,

    #[error("Internal server error")]
    Unexpected(String),
}

impl AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "INVALID_REQUEST",
            AppError::InvalidSchema(_) => "INVALID_SCHEMA",
            AppError::UpstreamRateLimited => "UPSTREAM_RATE_LIMITED",
            AppError::UpstreamQuotaExhausted => "UPSTREAM_QUOTA_EXHAUSTED",
            AppError::Unexpected(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidSchema(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamRateLimited => StatusCode::TOO_MANY_REQUESTS,
            AppError::UpstreamQuotaExhausted => StatusCode::PAYMENT_REQUIRED,
            AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Upstream detail stays in the server log; the Display impl for
        // Unexpected is a fixed generic message.
        if let AppError::Unexpected(detail) = self {
            log::error!("unexpected failure ({}): {}", self.error_code(), detail);
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.status_code().as_u16(),
        })
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidRequest(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
