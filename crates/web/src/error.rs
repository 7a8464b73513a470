use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use bookreview_core::error::CoreError;

use crate::middleware::auth::login_url;
use crate::templates;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent HTML error pages.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `bookreview_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A malformed multipart upload.
    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),

    /// The page needs a signed-in user; `next` is where to return afterwards.
    #[error("Login required")]
    LoginRequired { next: String },

    /// No route matched the request path.
    #[error("No route")]
    NoRoute,
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Shorthand for a missing entity.
    pub fn not_found(entity: &'static str, id: bookreview_core::types::DbId) -> Self {
        AppError::Core(CoreError::NotFound { entity, id })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => {
                    (StatusCode::NOT_FOUND, format!("{entity} with id {id} not found"))
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::Multipart(err) => (StatusCode::BAD_REQUEST, err.body_text()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
            AppError::LoginRequired { next } => {
                return Redirect::to(&login_url(next)).into_response();
            }
            AppError::NoRoute => (
                StatusCode::NOT_FOUND,
                "The requested page does not exist.".to_string(),
            ),
        };

        let body = templates::errors::error_page(status, &message);
        (status, axum::response::Html(body.into_string())).into_response()
    }
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "An internal error occurred".to_string(),
    )
}

/// Classify a sqlx error into an HTTP status and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, String) {
    match err {
        sqlx::Error::RowNotFound => (StatusCode::NOT_FOUND, "Resource not found".to_string()),
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            tracing::debug!(error = %db_err, "Unique constraint violation");
            (
                StatusCode::CONFLICT,
                "A record with these details already exists.".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
