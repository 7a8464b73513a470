//! Cookie-session authentication extractors for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use bookreview_core::types::DbId;
use bookreview_db::repositories::{SessionRepo, UserRepo};

use crate::auth::cookies::read_cookie;
use crate::auth::session::{hash_session_id, validate_session_token, SESSION_COOKIE};
use crate::error::AppError;
use crate::state::AppState;

/// The signed-in user behind the request's session cookie.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The user's internal database id.
    pub user_id: DbId,
    pub username: String,
    pub is_staff: bool,
    /// Hash of the session id, used to revoke the session on logout.
    pub token_hash: String,
}

/// Per-request cache so several extractors resolve the session only once.
#[derive(Clone)]
struct ResolvedUser(Option<CurrentUser>);

/// Resolve the session cookie into a [`CurrentUser`].
///
/// A missing, forged, expired or revoked session, or an inactive account,
/// all resolve to `None` (anonymous). Only database failures are errors.
async fn resolve(parts: &mut Parts, state: &AppState) -> Result<Option<CurrentUser>, AppError> {
    if let Some(ResolvedUser(cached)) = parts.extensions.get::<ResolvedUser>() {
        return Ok(cached.clone());
    }

    let user = lookup(parts, state).await?;
    parts.extensions.insert(ResolvedUser(user.clone()));
    Ok(user)
}

async fn lookup(parts: &Parts, state: &AppState) -> Result<Option<CurrentUser>, AppError> {
    let Some(token) = read_cookie(&parts.headers, SESSION_COOKIE) else {
        return Ok(None);
    };

    let claims = match validate_session_token(&token, &state.config.session) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring invalid session cookie");
            return Ok(None);
        }
    };

    let token_hash = hash_session_id(&claims.jti);
    let Some(session) = SessionRepo::find_active_by_token_hash(&state.pool, &token_hash).await?
    else {
        return Ok(None);
    };
    if session.user_id != claims.sub {
        return Ok(None);
    }

    let user = UserRepo::find_by_id(&state.pool, session.user_id).await?;
    Ok(user.filter(|u| u.is_active).map(|u| CurrentUser {
        user_id: u.id,
        username: u.username,
        is_staff: u.is_staff,
        token_hash,
    }))
}

/// The current user if signed in, `None` for anonymous visitors.
///
/// ```ignore
/// async fn page(MaybeUser(user): MaybeUser) -> AppResult<Html<String>> { .. }
/// ```
pub struct MaybeUser(pub Option<CurrentUser>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(resolve(parts, state).await?))
    }
}

/// Requires a signed-in user. Anonymous requests are redirected to the login
/// page with the current path as `next`.
///
/// ```ignore
/// async fn add_book(AuthUser(user): AuthUser) -> AppResult<Response> { .. }
/// ```
pub struct AuthUser(pub CurrentUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve(parts, state).await? {
            Some(user) => Ok(AuthUser(user)),
            None => Err(AppError::LoginRequired {
                next: parts
                    .uri
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_else(|| parts.uri.path().to_string()),
            }),
        }
    }
}

/// Login page URL that returns to `next` afterwards.
pub fn login_url(next: &str) -> String {
    format!("/login/?next={}", urlencoding::encode(next))
}

/// Restrict a post-login redirect target to a local path.
///
/// Anything that could leave the site (absolute URLs, `//host`, backslash
/// tricks) falls back to `/`.
pub fn safe_next(next: Option<&str>) -> String {
    match next.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.contains('\\')
                && !path.chars().any(char::is_control) =>
        {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_url_encodes_next() {
        assert_eq!(login_url("/book/3/review/"), "/login/?next=%2Fbook%2F3%2Freview%2F");
        assert_eq!(login_url("/books/?q=a b"), "/login/?next=%2Fbooks%2F%3Fq%3Da%20b");
    }

    #[test]
    fn safe_next_keeps_local_paths() {
        assert_eq!(safe_next(Some("/book/1/")), "/book/1/");
        assert_eq!(safe_next(Some("/books/?q=x")), "/books/?q=x");
    }

    #[test]
    fn safe_next_rejects_offsite_targets() {
        assert_eq!(safe_next(None), "/");
        assert_eq!(safe_next(Some("")), "/");
        assert_eq!(safe_next(Some("https://evil.example/")), "/");
        assert_eq!(safe_next(Some("//evil.example/")), "/");
        assert_eq!(safe_next(Some("/\\evil.example")), "/");
    }
}
