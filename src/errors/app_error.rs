//! Top-level application error type
//!
//! `AppError` is the error surface for REST handlers and server startup.
//! It converts domain errors (storage, providers, configuration) into
//! consistent JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::core::llm::LLMError;
use crate::core::stt::STTError;
use crate::core::tts::TTSError;
use crate::storage::StorageError;

/// Result alias for fallible application-level operations
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request was malformed or failed validation
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Session/turn persistence failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Speech-to-text provider failed
    #[error(transparent)]
    Stt(#[from] STTError),

    /// Language model provider failed
    #[error(transparent)]
    Llm(#[from] LLMError),

    /// Text-to-speech provider failed
    #[error(transparent)]
    Tts(#[from] TTSError),

    /// Filesystem or socket error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Map the error to an HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Stt(_) | AppError::Llm(_) | AppError::Tts(_) => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_) | AppError::Storage(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
