use crate::content::CommentValidationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by the JSON API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request is missing or has malformed fields.
    #[error("{0}")]
    Validation(String),

    /// Notion could not be reached or returned an error.
    #[error("{0}")]
    Upstream(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CommentValidationError> for ApiError {
    fn from(err: CommentValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Upstream(e) = &self {
            // Full chain in the log, outermost context only in the response
            error!("Upstream request failed: {:#}", e);
        }

        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
