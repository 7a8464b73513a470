//! Handlers for the catalog: home, list/search, detail, add, edit, delete.

use axum::extract::{Multipart, Query, State};
use axum::response::Response;
use bookreview_core::search::normalize_query;
use bookreview_core::types::DbId;
use bookreview_db::models::book::Book;
use bookreview_db::repositories::{BookRepo, ReviewRepo};
use serde::Deserialize;

use super::{is_unique_violation, IdParam};
use crate::error::{AppError, AppResult};
use crate::flash::{redirect_with, Flash};
use crate::forms::book::{BookForm, BookSubmission, CleanBook, DUPLICATE_ISBN_MESSAGE};
use crate::forms::FormErrors;
use crate::middleware::auth::AuthUser;
use crate::middleware::page::PageContext;
use crate::state::AppState;
use crate::templates;

/// How many books the home page shows.
const RECENT_BOOKS: i64 = 6;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /books/`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SearchParams {
    pub q: Option<String>,
}

// ---------------------------------------------------------------------------
// Shared helpers (also used by the admin console)
// ---------------------------------------------------------------------------

pub(crate) async fn find_book(state: &AppState, id: DbId) -> AppResult<Book> {
    BookRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Book", id))
}

/// Run the form checks, then the ISBN uniqueness check against the database.
///
/// `editing` is the id of the book being changed, so it does not collide with
/// its own ISBN.
pub(crate) async fn validate_book(
    state: &AppState,
    submission: &BookSubmission,
    editing: Option<DbId>,
) -> AppResult<Result<CleanBook, FormErrors>> {
    let clean = match submission.clean() {
        Ok(clean) => clean,
        Err(errors) => return Ok(Err(errors)),
    };
    if BookRepo::isbn_taken(&state.pool, &clean.isbn, editing).await? {
        let mut errors = FormErrors::new();
        errors.add("isbn", DUPLICATE_ISBN_MESSAGE);
        return Ok(Err(errors));
    }
    Ok(Ok(clean))
}

/// Store the uploaded cover, if any, returning its media path.
pub(crate) async fn store_cover(state: &AppState, clean: &CleanBook) -> AppResult<Option<String>> {
    match &clean.cover {
        Some(bytes) => {
            let path = state
                .media
                .save_cover(bytes)
                .await
                .map_err(|e| AppError::InternalError(format!("Failed to store cover: {e}")))?;
            Ok(Some(path))
        }
        None => Ok(None),
    }
}

/// Outcome of persisting a validated book.
pub(crate) enum SaveOutcome {
    Saved(Book),
    /// A concurrent save took the ISBN between the check and the write.
    Rejected(FormErrors),
}

/// Persist a new book (`editing` is `None`) or replace an existing one.
///
/// On success an old cover replaced by a new upload is removed; on failure the
/// freshly stored upload is.
pub(crate) async fn save_book(
    state: &AppState,
    clean: CleanBook,
    editing: Option<&Book>,
) -> AppResult<SaveOutcome> {
    let new_cover = store_cover(state, &clean).await?;

    let result = match editing {
        None => BookRepo::create(&state.pool, &clean.into_create(new_cover.clone()))
            .await
            .map(Some),
        Some(book) => {
            BookRepo::update(&state.pool, book.id, &clean.into_update(new_cover.clone())).await
        }
    };

    match result {
        Ok(Some(saved)) => {
            if let (Some(_), Some(old)) = (&new_cover, editing.and_then(|b| b.cover_image.as_deref())) {
                state.media.delete_quietly(old).await;
            }
            Ok(SaveOutcome::Saved(saved))
        }
        Ok(None) => {
            if let Some(cover) = &new_cover {
                state.media.delete_quietly(cover).await;
            }
            let id = editing.map(|b| b.id).unwrap_or_default();
            Err(AppError::not_found("Book", id))
        }
        Err(e) => {
            if let Some(cover) = &new_cover {
                state.media.delete_quietly(cover).await;
            }
            if is_unique_violation(&e) {
                let mut errors = FormErrors::new();
                errors.add("isbn", DUPLICATE_ISBN_MESSAGE);
                return Ok(SaveOutcome::Rejected(errors));
            }
            Err(e.into())
        }
    }
}

fn book_url(id: DbId) -> String {
    format!("/book/{id}/")
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /
pub async fn home(State(state): State<AppState>, ctx: PageContext) -> AppResult<Response> {
    let total = BookRepo::count(&state.pool).await?;
    let recent = BookRepo::list_recent(&state.pool, RECENT_BOOKS).await?;
    Ok(ctx.respond(templates::books::home(&ctx, total, &recent)))
}

/// GET /books/?q=
///
/// Without a query, lists the whole catalog; with one, only books whose title
/// or author contains it (case-insensitive).
pub async fn list(
    State(state): State<AppState>,
    ctx: PageContext,
    Query(params): Query<SearchParams>,
) -> AppResult<Response> {
    let query = normalize_query(params.q.as_deref());
    let books = match &query {
        Some(q) => BookRepo::search(&state.pool, q).await?,
        None => BookRepo::list(&state.pool).await?,
    };
    Ok(ctx.respond(templates::books::list(&ctx, &books, query.as_deref())))
}

/// GET /book/{id}/
pub async fn detail(
    State(state): State<AppState>,
    IdParam(id): IdParam,
    ctx: PageContext,
) -> AppResult<Response> {
    let book = find_book(&state, id).await?;
    let reviews = ReviewRepo::list_for_book(&state.pool, id).await?;
    let summary = ReviewRepo::rating_summary(&state.pool, id).await?;
    let own_review = match &ctx.user {
        Some(user) => ReviewRepo::find_for_book_and_user(&state.pool, id, user.user_id).await?,
        None => None,
    };

    let view = templates::books::DetailView {
        book: &book,
        reviews: &reviews,
        summary,
        own_review: own_review.as_ref(),
    };
    Ok(ctx.respond(templates::books::detail(&ctx, &view)))
}

/// GET /book/add/
pub async fn add_form(AuthUser(_user): AuthUser, ctx: PageContext) -> Response {
    ctx.respond(templates::books::form_page(
        &ctx,
        "Add a book",
        "/book/add/",
        &BookForm::default(),
        &FormErrors::new(),
        None,
    ))
}

/// POST /book/add/
pub async fn add_submit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ctx: PageContext,
    multipart: Multipart,
) -> AppResult<Response> {
    let submission = BookSubmission::from_multipart(multipart).await?;
    let render = |errors: &FormErrors| {
        ctx.respond(templates::books::form_page(
            &ctx,
            "Add a book",
            "/book/add/",
            &submission.form,
            errors,
            None,
        ))
    };

    let clean = match validate_book(&state, &submission, None).await? {
        Ok(clean) => clean,
        Err(errors) => return Ok(render(&errors)),
    };
    let book = match save_book(&state, clean, None).await? {
        SaveOutcome::Saved(book) => book,
        SaveOutcome::Rejected(errors) => return Ok(render(&errors)),
    };

    tracing::info!(book_id = book.id, user_id = user.user_id, "Book created");
    Ok(redirect_with(
        &book_url(book.id),
        Flash::success(format!("Book \"{}\" added successfully!", book.title)),
    ))
}

/// GET /book/{id}/edit/
pub async fn edit_form(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    IdParam(id): IdParam,
    ctx: PageContext,
) -> AppResult<Response> {
    let book = find_book(&state, id).await?;
    Ok(ctx.respond(templates::books::form_page(
        &ctx,
        "Edit book",
        &format!("/book/{id}/edit/"),
        &BookForm::from_book(&book),
        &FormErrors::new(),
        book.cover_image.as_deref(),
    )))
}

/// POST /book/{id}/edit/
pub async fn edit_submit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    IdParam(id): IdParam,
    ctx: PageContext,
    multipart: Multipart,
) -> AppResult<Response> {
    let book = find_book(&state, id).await?;
    let submission = BookSubmission::from_multipart(multipart).await?;
    let action = format!("/book/{id}/edit/");
    let render = |errors: &FormErrors| {
        ctx.respond(templates::books::form_page(
            &ctx,
            "Edit book",
            &action,
            &submission.form,
            errors,
            book.cover_image.as_deref(),
        ))
    };

    let clean = match validate_book(&state, &submission, Some(id)).await? {
        Ok(clean) => clean,
        Err(errors) => return Ok(render(&errors)),
    };
    let updated = match save_book(&state, clean, Some(&book)).await? {
        SaveOutcome::Saved(updated) => updated,
        SaveOutcome::Rejected(errors) => return Ok(render(&errors)),
    };

    tracing::info!(book_id = id, user_id = user.user_id, "Book updated");
    Ok(redirect_with(
        &book_url(id),
        Flash::success(format!("Book \"{}\" updated successfully!", updated.title)),
    ))
}

/// GET /book/{id}/delete/ -- confirmation page.
pub async fn delete_confirm(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    IdParam(id): IdParam,
    ctx: PageContext,
) -> AppResult<Response> {
    let book = find_book(&state, id).await?;
    let review_count = ReviewRepo::count_for_book(&state.pool, id).await?;
    Ok(ctx.respond(templates::books::confirm_delete(&ctx, &book, review_count)))
}

/// POST /book/{id}/delete/
///
/// Reviews go with the book (`ON DELETE CASCADE`); the cover file is removed
/// from media storage.
pub async fn delete_submit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> AppResult<Response> {
    let book = delete_book(&state, id).await?;
    tracing::info!(book_id = id, user_id = user.user_id, "Book deleted");
    Ok(redirect_with(
        "/books/",
        Flash::success(format!("Book \"{}\" deleted successfully!", book.title)),
    ))
}

/// Delete a book row and its cover file.
pub(crate) async fn delete_book(state: &AppState, id: DbId) -> AppResult<Book> {
    let book = BookRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Book", id))?;
    if let Some(cover) = &book.cover_image {
        state.media.delete_quietly(cover).await;
    }
    Ok(book)
}
