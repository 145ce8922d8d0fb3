//! Custom error types for the users service

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Custom error type for the users service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request rejected by an extractor, with the status it chose
    #[error("Request rejected ({0}): {1}")]
    Rejected(StatusCode, String),

    /// One or more fields failed validation
    #[error("Validation failed")]
    Validation(ValidationErrors),

    /// Resource not found
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Rejected(status, msg) => (status, json!({ "error": msg })),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Validation failed",
                    "validationErrors": errors,
                }),
            ),
            ApiError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{what} not found") }),
            ),
            ApiError::InternalServerError | ApiError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
