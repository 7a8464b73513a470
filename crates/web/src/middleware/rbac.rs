//! Staff-only access control.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bookreview_core::error::CoreError;

use super::auth::{AuthUser, CurrentUser};
use crate::error::AppError;
use crate::state::AppState;

/// Requires a staff account. Anonymous visitors are sent to the login page;
/// signed-in non-staff users get 403 Forbidden.
///
/// ```ignore
/// async fn admin_index(RequireStaff(user): RequireStaff) -> AppResult<Response> { .. }
/// ```
pub struct RequireStaff(pub CurrentUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_staff {
            return Err(AppError::Core(CoreError::Forbidden(
                "Staff access required".into(),
            )));
        }
        Ok(RequireStaff(user))
    }
}
