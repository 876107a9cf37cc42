use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{debug, error};

use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid event id: {0}")]
    InvalidId(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Storage unavailable")]
    StorageUnavailable(#[from] sqlx::Error),

    #[error("Stored document is corrupt")]
    CorruptDocument(#[from] serde_json::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingField(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidId(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::IncorrectPassword => StatusCode::FORBIDDEN,
            AppError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::CorruptDocument(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingField(_) => "MISSING_FIELD",
            AppError::InvalidRequest(_) => "INVALID_REQUEST",
            AppError::InvalidId(_) => "INVALID_ID",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::IncorrectPassword => "INCORRECT_PASSWORD",
            AppError::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            AppError::CorruptDocument(_) => "CORRUPT_DOCUMENT",
        }
    }

    fn log(&self) {
        match self {
            AppError::StorageUnavailable(e) => {
                error!(error = ?e, "Storage error");
            }
            AppError::CorruptDocument(e) => {
                error!(error = %e, "Stored event document failed to decode");
            }
            other => {
                debug!(code = other.code(), message = %other, "Request rejected");
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        // Infrastructure faults keep their details in the log only
        let public_message = match &self {
            AppError::StorageUnavailable(_) => "The event store is unavailable".to_string(),
            AppError::CorruptDocument(_) => "A stored event could not be read".to_string(),
            other => other.to_string(),
        };

        error_response(code, public_message, status)
    }
}
