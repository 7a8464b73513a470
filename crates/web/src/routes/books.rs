//! Route definitions for the catalog and reviews.

use axum::routing::get;
use axum::Router;

use crate::handlers::{books, reviews};
use crate::state::AppState;

/// Catalog routes, mounted at the root.
///
/// ```text
/// GET         /                    -> home
/// GET         /books/              -> list
/// GET, POST   /book/add/           -> add_form, add_submit
/// GET         /book/{id}/          -> detail
/// GET, POST   /book/{id}/edit/     -> edit_form, edit_submit
/// GET, POST   /book/{id}/delete/   -> delete_confirm, delete_submit
/// GET, POST   /book/{id}/review/   -> review_form, review_submit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(books::home))
        .route("/books/", get(books::list))
        .route("/book/add/", get(books::add_form).post(books::add_submit))
        .route("/book/{id}/", get(books::detail))
        .route(
            "/book/{id}/edit/",
            get(books::edit_form).post(books::edit_submit),
        )
        .route(
            "/book/{id}/delete/",
            get(books::delete_confirm).post(books::delete_submit),
        )
        .route(
            "/book/{id}/review/",
            get(reviews::review_form).post(reviews::review_submit),
        )
}
