//! Error handling module for the badge catalog.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const NOT_LOADED: &str = "NOT_LOADED";
    pub const SOURCE_UNAVAILABLE: &str = "SOURCE_UNAVAILABLE";
    pub const SOURCE_DECODE: &str = "SOURCE_DECODE";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Application error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Resource not found
    NotFound(String),
    /// Validation error (configuration or request values)
    Validation(String),
    /// Bad request
    BadRequest(String),
    /// Badge collection has not finished loading yet
    NotLoaded(String),
    /// Badge source could not be reached or answered with a failure status
    SourceUnavailable(String),
    /// Badge source answered with a document that does not match the badge schema
    SourceDecode(String),
    /// Internal server error
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotLoaded(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::SourceUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::SourceDecode(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
            AppError::NotLoaded(_) => codes::NOT_LOADED,
            AppError::SourceUnavailable(_) => codes::SOURCE_UNAVAILABLE,
            AppError::SourceDecode(_) => codes::SOURCE_DECODE,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Stamp the error with the catalog generation it was observed at.
    pub fn at(self, generation: u64) -> ApiError {
        ApiError {
            error: self,
            generation,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::BadRequest(msg)
            | AppError::NotLoaded(msg)
            | AppError::SourceUnavailable(msg)
            | AppError::SourceDecode(msg)
            | AppError::Internal(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::error!("Badge source error: {:?}", err);
        match err.status() {
            Some(status) => {
                AppError::SourceUnavailable(format!("Badge source answered {}", status))
            }
            None if err.is_decode() => {
                AppError::SourceDecode(format!("Badge source body unreadable: {}", err))
            }
            None => AppError::SourceUnavailable(format!("Badge source unreachable: {}", err)),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::SourceDecode(format!("JSON error: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
    pub generation: u64,
}

impl ErrorResponse {
    pub fn new(error: &AppError, generation: u64) -> Self {
        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
            },
            generation,
        }
    }
}

/// An error answered over the JSON API, together with the catalog generation
/// the request saw.
#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    pub generation: u64,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let body = ErrorResponse::new(&self.error, self.generation);
        (status, Json(body)).into_response()
    }
}
