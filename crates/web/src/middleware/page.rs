//! Per-request context shared by every rendered page.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{Html, IntoResponse, Response};
use maud::Markup;

use super::auth::{CurrentUser, MaybeUser};
use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::state::AppState;

/// The signed-in user, pending flash messages and current path.
pub struct PageContext {
    pub user: Option<CurrentUser>,
    pub messages: Vec<Flash>,
    /// Request path plus query, used as the login `next` target.
    pub path: String,
}

impl PageContext {
    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Serve a rendered page, consuming any flash messages it displayed.
    pub fn respond(&self, markup: Markup) -> Response {
        let mut response = Html(markup.into_string()).into_response();
        if !self.messages.is_empty() {
            flash::append_set_cookie(response.headers_mut(), &flash::clear());
        }
        response
    }
}

impl FromRequestParts<AppState> for PageContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state).await?;
        Ok(PageContext {
            user,
            messages: flash::take(&parts.headers),
            path: parts
                .uri
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| "/".to_string()),
        })
    }
}
