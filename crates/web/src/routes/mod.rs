pub mod accounts;
pub mod admin;
pub mod books;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the page route tree.
///
/// Route hierarchy:
///
/// ```text
/// /                                  home
/// /books/                            list, search (?q=)
/// /book/add/                         add form, create (auth required)
/// /book/{id}/                        detail
/// /book/{id}/edit/                   edit form, update (auth required)
/// /book/{id}/delete/                 confirm, delete (auth required)
/// /book/{id}/review/                 review form, create (auth required)
///
/// /register/                         sign-up form, create account
/// /login/                            login form, sign in
/// /logout/                           sign out (POST)
///
/// /admin/                            console index (staff only)
/// /admin/books/                      changelist
/// /admin/books/{id}/                 change form, update
/// /admin/books/{id}/delete/          confirm, delete
/// /admin/reviews/                    changelist
/// /admin/reviews/{id}/               change
/// /admin/reviews/{id}/delete/        confirm, delete
/// ```
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .merge(books::router())
        .merge(accounts::router())
        .merge(admin::router())
}

/// Path patterns served by [`page_routes`], with `*` standing for an id.
const PAGE_PATTERNS: &[&str] = &[
    "/",
    "/books/",
    "/book/add/",
    "/book/*/",
    "/book/*/edit/",
    "/book/*/delete/",
    "/book/*/review/",
    "/register/",
    "/login/",
    "/logout/",
    "/admin/",
    "/admin/books/",
    "/admin/books/*/",
    "/admin/books/*/delete/",
    "/admin/reviews/",
    "/admin/reviews/*/",
    "/admin/reviews/*/delete/",
];

/// Whether `path` would be served by one of the page routes.
pub fn is_page_path(path: &str) -> bool {
    PAGE_PATTERNS.iter().any(|pattern| {
        let mut segments = path.split('/');
        let mut expected = pattern.split('/');
        loop {
            match (segments.next(), expected.next()) {
                (None, None) => return true,
                (Some(segment), Some("*")) if !segment.is_empty() => {}
                (Some(segment), Some(part)) if segment == part => {}
                _ => return false,
            }
        }
    })
}
