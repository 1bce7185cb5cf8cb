use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::uploads::UploadError;

/// Error types for product operations
#[derive(Debug, thiserror::Error)]
pub enum ProductError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Product not found")]
    NotFound,

    /// The identity owns no business, so it cannot hold products
    #[error("No business found for this account")]
    BusinessNotFound,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Failed to store uploaded image")]
    UploadFailed,
}

impl From<sqlx::Error> for ProductError {
    fn from(err: sqlx::Error) -> Self {
        ProductError::DatabaseError(err.to_string())
    }
}

impl From<UploadError> for ProductError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::Malformed(msg) => ProductError::ValidationError(msg),
            UploadError::UnsupportedType => ProductError::ValidationError(
                "Only jpeg, jpg, png and gif files are allowed".to_string(),
            ),
            UploadError::Io(_) => ProductError::UploadFailed,
        }
    }
}

impl IntoResponse for ProductError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ProductError::DatabaseError(msg) => {
                tracing::error!("Database error in products: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ProductError::NotFound => (StatusCode::NOT_FOUND, "Product not found".to_string()),
            ProductError::BusinessNotFound => (
                StatusCode::NOT_FOUND,
                "No business found for this account".to_string(),
            ),
            ProductError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ProductError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ProductError::UploadFailed => {
                tracing::error!("Failed to store uploaded product image");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to store uploaded image".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
