//! API error type and its HTTP mapping.
//!
//! Every failure leaves a handler as an [`ApiError`], which renders as a status code plus a
//! JSON [`ErrorRes`] body. Store faults keep their detail in the log only.

use api_shared::ErrorRes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dtr_core::{RecordError, ValidationErrors, NOT_FOUND_MESSAGE};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing diagnostic test {0}")]
    MissingParameter(&'static str),
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{context}")]
    Internal { context: &'static str, detail: String },
}

impl ApiError {
    /// Maps a store error for an operation described by `context`.
    ///
    /// `context` is the message clients see when the store itself fails, for example
    /// `"Failed to create diagnostic test"`.
    pub fn store(context: &'static str) -> impl FnOnce(RecordError) -> ApiError {
        move |err| match err {
            RecordError::Validation(errors) => ApiError::Validation(errors),
            RecordError::NotFound { .. } => ApiError::NotFound(NOT_FOUND_MESSAGE.into()),
            other => ApiError::Internal {
                context,
                detail: other.to_string(),
            },
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingParameter(_) | ApiError::Validation(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(errors) => ErrorRes::from(errors),
            ApiError::Internal { context, detail } => {
                tracing::error!(detail, "{}", context);
                ErrorRes::new(*context)
            }
            other => ErrorRes::new(other.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
