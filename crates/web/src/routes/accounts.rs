//! Route definitions for account pages.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Account routes, mounted at the root.
///
/// ```text
/// GET, POST   /register/   -> register_form, register_submit
/// GET, POST   /login/      -> login_form, login_submit
/// POST        /logout/     -> logout
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/register/",
            get(auth::register_form).post(auth::register_submit),
        )
        .route("/login/", get(auth::login_form).post(auth::login_submit))
        .route("/logout/", post(auth::logout))
}
