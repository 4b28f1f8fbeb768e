//! Error types for the PDF/UA server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::conversion::ConversionFailure;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing, unnamed or non-PDF upload
    #[error("{0}")]
    InvalidUpload(String),

    #[error("File too large. Maximum size is {max_megabytes}MB.")]
    PayloadTooLarge { max_megabytes: usize },

    #[error(transparent)]
    Conversion(#[from] ConversionFailure),

    /// Scratch file or upload handling failed
    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Endpoint not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Conversion(_) | AppError::Processing(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                "Internal server error".to_string()
            }
            AppError::Processing(detail) => {
                tracing::error!("Processing error: {}", detail);
                self.to_string()
            }
            AppError::Conversion(failure) => {
                tracing::warn!("{}", failure);
                self.to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
