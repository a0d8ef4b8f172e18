use actix_web::{HttpResponse, ResponseError, error::BlockingError, http::StatusCode};
use derive_more::Display;
use tracing::error;

use crate::models::ApiResponse;
use crate::repository::RepoError;

/// Every failure the core can report. The HTTP layer maps each kind to a status.
#[derive(Debug, Display)]
pub enum AppError {
    #[display(fmt = "user not found")]
    UserNotFound,

    #[display(fmt = "resource not found")]
    NotFound,

    #[display(fmt = "email already registered")]
    EmailExists,

    #[display(fmt = "attendance already marked for today")]
    AlreadyMarked,

    #[display(fmt = "unauthorized")]
    Unauthorized,

    #[display(fmt = "admin access required")]
    Forbidden,

    #[display(fmt = "invalid email or password")]
    InvalidCredentials,

    #[display(fmt = "invalid input: {}", _0)]
    Invalid(String),

    #[display(fmt = "internal server error")]
    Infrastructure(anyhow::Error),
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn infra(err: impl Into<anyhow::Error>) -> Self {
        AppError::Infrastructure(err.into())
    }

    fn message(&self) -> &'static str {
        match self {
            AppError::UserNotFound | AppError::NotFound => "Not found",
            AppError::EmailExists | AppError::AlreadyMarked => "Conflict",
            AppError::Unauthorized => "Unauthorized",
            AppError::Forbidden => "Forbidden",
            AppError::InvalidCredentials => "Login failed",
            AppError::Invalid(_) => "Invalid request",
            AppError::Infrastructure(_) => "Something went wrong",
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        AppError::Infrastructure(err.into())
    }
}

impl From<BlockingError> for AppError {
    fn from(err: BlockingError) -> Self {
        AppError::Infrastructure(anyhow::anyhow!("blocking task failed: {}", err))
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::UserNotFound | AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::EmailExists | AppError::AlreadyMarked => StatusCode::CONFLICT,
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Invalid(_) => StatusCode::BAD_REQUEST,
            AppError::Infrastructure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Infrastructure(cause) = self {
            // the cause stays in the log, the client only sees the opaque message
            error!(error = ?cause, "Infrastructure failure");
        }

        let status = self.status_code();
        HttpResponse::build(status).json(ApiResponse::<()>::failure(
            status,
            self.message(),
            self.to_string(),
        ))
    }
}
