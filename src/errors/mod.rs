/// Unified error handling module
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Unified error response format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),
    #[error("Invalid pagination: {0}")]
    InvalidPagination(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl ApiError {
    /// Machine-readable kind reported in the `code` field
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidFilter(_) => "INVALID_FILTER",
            ApiError::InvalidPagination(_) => "INVALID_PAGINATION",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidFilter(_) | ApiError::InvalidPagination(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::InvalidFilter(msg)
            | ApiError::InvalidPagination(msg)
            | ApiError::NotFound(msg)
            | ApiError::StoreUnavailable(msg) => msg.clone(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::StoreUnavailable(format!("database error: {}", err))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::StoreUnavailable(format!("malformed payload: {}", err))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::StoreUnavailable(format!("i/o error: {}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_response = ErrorResponse {
            ok: false,
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.message(),
            },
        };

        (self.status(), Json(error_response)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
