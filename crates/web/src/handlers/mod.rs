//! Request handlers.
//!
//! Each submodule holds the GET (render) and POST (mutate, then redirect)
//! handlers for one area of the site. Handlers delegate to the repositories
//! in `bookreview_db` and map errors via [`AppError`].

pub mod admin;
pub mod auth;
pub mod books;
pub mod fallback;
pub mod health;
pub mod reviews;

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use bookreview_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// Numeric `{id}` path segment.
///
/// Anything that is not a positive integer is treated as an unknown page
/// (404) rather than a bad request.
pub struct IdParam(pub DbId);

impl FromRequestParts<AppState> for IdParam {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NoRoute)?;
        raw.parse::<DbId>()
            .ok()
            .filter(|id| *id > 0)
            .map(IdParam)
            .ok_or(AppError::NoRoute)
    }
}

/// Whether a sqlx error is a unique-constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
