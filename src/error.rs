//! Error handling

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::data::TableError;
use crate::explain::ExplanationError;
use crate::render::page::error_page;
use crate::scoring::ScoringError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Lookup errors
    #[error("{0}")]
    NotFound(String),

    // Validation errors
    #[error("{0}")]
    ValidationError(String),

    /// Scoring endpoint answered with a non-200 status
    #[error("Request failed with status {status}, {body}")]
    ScoringRejected { status: u16, body: String },

    // External service errors
    #[error("{0}")]
    ExternalServiceError(String),

    // Generic errors
    #[error("{0}")]
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ScoringRejected { .. } | AppError::ExternalServiceError(_) => {
                StatusCode::BAD_GATEWAY
            }
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn log(&self) {
        match self {
            AppError::ScoringRejected { status, body } => {
                tracing::error!("Scoring endpoint rejected request ({}): {}", status, body);
            }
            AppError::ExternalServiceError(msg) => {
                tracing::error!("External service error: {}", msg);
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
            }
            AppError::NotFound(msg) | AppError::ValidationError(msg) => {
                tracing::debug!("Request rejected: {}", msg);
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status();

        let body = match &self {
            AppError::ScoringRejected { status: upstream, body } => json!({
                "error": self.to_string(),
                "status": status.as_u16(),
                "upstream_status": upstream,
                "upstream_body": body,
            }),
            AppError::InternalError(_) => json!({
                "error": "Internal server error",
                "status": status.as_u16(),
            }),
            _ => json!({
                "error": self.to_string(),
                "status": status.as_u16(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Failure of a dashboard rendering pass, answered with an HTML page.
#[derive(Debug)]
pub struct PageError(pub AppError);

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        self.0.log();
        let status = self.0.status();
        let message = match &self.0 {
            AppError::InternalError(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        (status, Html(error_page(status.as_u16(), &message))).into_response()
    }
}

impl From<TableError> for AppError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::UnknownClient(_) | TableError::UnknownFeature(_) => {
                AppError::NotFound(err.to_string())
            }
            other => AppError::InternalError(other.to_string()),
        }
    }
}

impl From<ExplanationError> for AppError {
    fn from(err: ExplanationError) -> Self {
        match err {
            ExplanationError::Missing(_) => AppError::NotFound(err.to_string()),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

impl From<ScoringError> for AppError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::Lookup(inner) => inner.into(),
            ScoringError::Request { status, body } => AppError::ScoringRejected { status, body },
            other => AppError::ExternalServiceError(other.to_string()),
        }
    }
}
