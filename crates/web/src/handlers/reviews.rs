//! Handlers for `/book/{id}/review/`.
//!
//! A user may review a book once. Both the form and the submission check for
//! an existing review first and bounce back to the book page with a warning;
//! the unique index on `(book_id, user_id)` catches a double submit that
//! races past that check, and it is reported the same way.

use axum::extract::State;
use axum::response::Response;
use axum::Form;
use bookreview_core::types::DbId;
use bookreview_db::models::review::CreateReview;
use bookreview_db::repositories::ReviewRepo;

use super::books::find_book;
use super::{is_unique_violation, IdParam};
use crate::error::AppResult;
use crate::flash::{redirect_with, Flash};
use crate::forms::review::ReviewForm;
use crate::forms::FormErrors;
use crate::middleware::auth::AuthUser;
use crate::middleware::page::PageContext;
use crate::state::AppState;
use crate::templates;

const ALREADY_REVIEWED: &str = "You have already reviewed this book.";

fn back_to_book(book_id: DbId, flash: Flash) -> Response {
    redirect_with(&format!("/book/{book_id}/"), flash)
}

/// GET /book/{id}/review/
pub async fn review_form(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    IdParam(book_id): IdParam,
    ctx: PageContext,
) -> AppResult<Response> {
    let book = find_book(&state, book_id).await?;
    if ReviewRepo::exists_for_book_and_user(&state.pool, book_id, user.user_id).await? {
        return Ok(back_to_book(book_id, Flash::warning(ALREADY_REVIEWED)));
    }
    Ok(ctx.respond(templates::reviews::form_page(
        &ctx,
        &book,
        &ReviewForm::default(),
        &FormErrors::new(),
    )))
}

/// POST /book/{id}/review/
pub async fn review_submit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    IdParam(book_id): IdParam,
    ctx: PageContext,
    Form(form): Form<ReviewForm>,
) -> AppResult<Response> {
    let book = find_book(&state, book_id).await?;
    if ReviewRepo::exists_for_book_and_user(&state.pool, book_id, user.user_id).await? {
        return Ok(back_to_book(book_id, Flash::warning(ALREADY_REVIEWED)));
    }

    let clean = match form.clean() {
        Ok(clean) => clean,
        Err(errors) => {
            return Ok(ctx.respond(templates::reviews::form_page(&ctx, &book, &form, &errors)));
        }
    };

    let input = CreateReview {
        book_id,
        user_id: user.user_id,
        rating: clean.rating,
        review_text: clean.review_text,
    };
    let review = match ReviewRepo::create(&state.pool, &input).await {
        Ok(review) => review,
        Err(e) if is_unique_violation(&e) => {
            return Ok(back_to_book(book_id, Flash::warning(ALREADY_REVIEWED)));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        review_id = review.id,
        book_id,
        user_id = user.user_id,
        rating = review.rating,
        "Review created"
    );
    Ok(back_to_book(book_id, Flash::success("Your review has been added!")))
}
