//! Route definitions for the `/admin` console.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Staff console routes, mounted at the root.
///
/// All routes require a staff account (enforced by handler extractors).
///
/// ```text
/// GET         /admin/                       -> index
/// GET         /admin/books/                 -> book_list
/// GET, POST   /admin/books/{id}/            -> book_change_form, book_change_submit
/// GET, POST   /admin/books/{id}/delete/     -> book_delete_confirm, book_delete_submit
/// GET         /admin/reviews/               -> review_list
/// GET, POST   /admin/reviews/{id}/          -> review_change_form, review_change_submit
/// GET, POST   /admin/reviews/{id}/delete/   -> review_delete_confirm, review_delete_submit
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/", get(admin::index))
        .route("/admin/books/", get(admin::book_list))
        .route(
            "/admin/books/{id}/",
            get(admin::book_change_form).post(admin::book_change_submit),
        )
        .route(
            "/admin/books/{id}/delete/",
            get(admin::book_delete_confirm).post(admin::book_delete_submit),
        )
        .route("/admin/reviews/", get(admin::review_list))
        .route(
            "/admin/reviews/{id}/",
            get(admin::review_change_form).post(admin::review_change_submit),
        )
        .route(
            "/admin/reviews/{id}/delete/",
            get(admin::review_delete_confirm).post(admin::review_delete_submit),
        )
}
