//! REST API module for HTTP endpoints
//!
//! Provides the catalog endpoints:
//! - `POST /places` - Create a place
//! - `GET /places` - List places
//! - `GET /places/:place_id` - Get a place with its reviews
//! - `PUT /places/:place_id` - Replace a place's fields
//! - `DELETE /places/:place_id` - Delete a place and its reviews
//! - `POST /places/:place_id/reviews` - Add a review to a place

pub mod places;
pub mod reviews;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::validation::ValidationErrors;

/// Error body shape: `{"detail": ...}`
#[derive(Debug, Serialize)]
pub struct ErrorDetail<T> {
    pub detail: T,
}

/// API error mapped onto an HTTP status
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Place not found")]
    PlaceNotFound,

    #[error("invalid request: {0}")]
    Validation(#[from] ValidationErrors),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::PlaceNotFound => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::PlaceNotFound => (
                status,
                Json(ErrorDetail {
                    detail: "Place not found",
                }),
            )
                .into_response(),
            ApiError::Validation(errors) => {
                tracing::debug!(invalid_fields = errors.errors().len(), "rejected request body");
                (status, Json(ErrorDetail { detail: errors })).into_response()
            }
        }
    }
}

/// Result type for REST handlers
pub type ApiResult<T> = Result<T, ApiError>;
