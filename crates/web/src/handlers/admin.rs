//! Handlers for the `/admin` staff console.
//!
//! Books: changelist with genre / publication date / created filters and
//! search over title, author and ISBN; change page; delete.
//! Reviews: changelist with rating / created / user filters and search over
//! book title and username; change page for rating and text; delete.

use axum::extract::{Multipart, Query, State};
use axum::response::Response;
use axum::Form;
use bookreview_core::types::DbId;
use bookreview_db::models::review::ReviewDetail;
use bookreview_db::repositories::{BookRepo, ReviewRepo, UserRepo};
use chrono::Utc;

use super::books::{delete_book, find_book, save_book, validate_book, SaveOutcome};
use super::IdParam;
use crate::error::{AppError, AppResult};
use crate::flash::{redirect_with, Flash};
use crate::forms::book::{BookForm, BookSubmission};
use crate::forms::filters::{BookListQuery, ReviewListQuery};
use crate::forms::review::ReviewForm;
use crate::forms::FormErrors;
use crate::middleware::page::PageContext;
use crate::middleware::rbac::RequireStaff;
use crate::state::AppState;
use crate::templates;

async fn find_review(state: &AppState, id: DbId) -> AppResult<ReviewDetail> {
    ReviewRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Review", id))
}

/// GET /admin/
pub async fn index(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    ctx: PageContext,
) -> AppResult<Response> {
    let books = BookRepo::count(&state.pool).await?;
    let reviews = ReviewRepo::count(&state.pool).await?;
    let users = UserRepo::count(&state.pool).await?;
    Ok(ctx.respond(templates::admin::index(&ctx, books, reviews, users)))
}

// ---------------------------------------------------------------------------
// Books
// ---------------------------------------------------------------------------

/// GET /admin/books/
pub async fn book_list(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    ctx: PageContext,
    Query(query): Query<BookListQuery>,
) -> AppResult<Response> {
    let today = Utc::now().date_naive();
    let books = BookRepo::admin_list(&state.pool, &query.to_filter(), today).await?;
    let genres = BookRepo::list_genres(&state.pool).await?;
    Ok(ctx.respond(templates::admin::book_list(&ctx, &books, &query, &genres)))
}

/// GET /admin/books/{id}/
pub async fn book_change_form(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    IdParam(id): IdParam,
    ctx: PageContext,
) -> AppResult<Response> {
    let book = find_book(&state, id).await?;
    Ok(ctx.respond(templates::admin::book_change(
        &ctx,
        &book,
        &BookForm::from_book(&book),
        &FormErrors::new(),
    )))
}

/// POST /admin/books/{id}/
pub async fn book_change_submit(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    IdParam(id): IdParam,
    ctx: PageContext,
    multipart: Multipart,
) -> AppResult<Response> {
    let book = find_book(&state, id).await?;
    let submission = BookSubmission::from_multipart(multipart).await?;
    let render = |errors: &FormErrors| {
        ctx.respond(templates::admin::book_change(&ctx, &book, &submission.form, errors))
    };

    let clean = match validate_book(&state, &submission, Some(id)).await? {
        Ok(clean) => clean,
        Err(errors) => return Ok(render(&errors)),
    };
    let updated = match save_book(&state, clean, Some(&book)).await? {
        SaveOutcome::Saved(updated) => updated,
        SaveOutcome::Rejected(errors) => return Ok(render(&errors)),
    };

    tracing::info!(book_id = id, user_id = staff.user_id, "Book changed from admin");
    Ok(redirect_with(
        "/admin/books/",
        Flash::success(format!("The book \u{201c}{}\u{201d} was changed successfully.", updated.title)),
    ))
}

/// GET /admin/books/{id}/delete/
pub async fn book_delete_confirm(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    IdParam(id): IdParam,
    ctx: PageContext,
) -> AppResult<Response> {
    let book = find_book(&state, id).await?;
    let review_count = ReviewRepo::count_for_book(&state.pool, id).await?;
    Ok(ctx.respond(templates::admin::book_delete(&ctx, &book, review_count)))
}

/// POST /admin/books/{id}/delete/
pub async fn book_delete_submit(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> AppResult<Response> {
    let book = delete_book(&state, id).await?;
    tracing::info!(book_id = id, user_id = staff.user_id, "Book deleted from admin");
    Ok(redirect_with(
        "/admin/books/",
        Flash::success(format!("The book \u{201c}{}\u{201d} was deleted successfully.", book.title)),
    ))
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// GET /admin/reviews/
pub async fn review_list(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    ctx: PageContext,
    Query(query): Query<ReviewListQuery>,
) -> AppResult<Response> {
    let today = Utc::now().date_naive();
    let reviews = ReviewRepo::admin_list(&state.pool, &query.to_filter(), today).await?;
    let users = UserRepo::list_reviewers(&state.pool).await?;
    Ok(ctx.respond(templates::admin::review_list(&ctx, &reviews, &query, &users)))
}

/// GET /admin/reviews/{id}/
pub async fn review_change_form(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    IdParam(id): IdParam,
    ctx: PageContext,
) -> AppResult<Response> {
    let review = find_review(&state, id).await?;
    Ok(ctx.respond(templates::admin::review_change(
        &ctx,
        &review,
        &ReviewForm::from_review(&review),
        &FormErrors::new(),
    )))
}

/// POST /admin/reviews/{id}/
pub async fn review_change_submit(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    IdParam(id): IdParam,
    ctx: PageContext,
    Form(form): Form<ReviewForm>,
) -> AppResult<Response> {
    let review = find_review(&state, id).await?;
    let clean = match form.clean() {
        Ok(clean) => clean,
        Err(errors) => {
            return Ok(ctx.respond(templates::admin::review_change(&ctx, &review, &form, &errors)));
        }
    };

    ReviewRepo::update(&state.pool, id, &clean.into_update())
        .await?
        .ok_or_else(|| AppError::not_found("Review", id))?;
    tracing::info!(review_id = id, user_id = staff.user_id, "Review changed from admin");
    Ok(redirect_with(
        "/admin/reviews/",
        Flash::success(format!(
            "The review of \u{201c}{}\u{201d} was changed successfully.",
            review.book_title
        )),
    ))
}

/// GET /admin/reviews/{id}/delete/
pub async fn review_delete_confirm(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    IdParam(id): IdParam,
    ctx: PageContext,
) -> AppResult<Response> {
    let review = find_review(&state, id).await?;
    Ok(ctx.respond(templates::admin::review_delete(&ctx, &review)))
}

/// POST /admin/reviews/{id}/delete/
pub async fn review_delete_submit(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> AppResult<Response> {
    if !ReviewRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Review", id));
    }
    tracing::info!(review_id = id, user_id = staff.user_id, "Review deleted from admin");
    Ok(redirect_with(
        "/admin/reviews/",
        Flash::success("The review was deleted successfully."),
    ))
}
