use bookreview_db::models::book::Book;
use maud::{html, Markup};

use super::fields;
use super::layout::page;
use crate::forms::review::ReviewForm;
use crate::forms::FormErrors;
use crate::middleware::page::PageContext;

/// `GET|POST /book/{id}/review/`
pub fn form_page(ctx: &PageContext, book: &Book, form: &ReviewForm, errors: &FormErrors) -> Markup {
    page(
        ctx,
        "Write a review",
        html! {
            h1 { "Review \u{201c}" (book.title) "\u{201d}" }
            p { "by " (book.author) }
            form method="post" action={ "/book/" (book.id) "/review/" } {
                (fields::non_field_errors(errors))
                (fields::rating_select(&form.rating, errors))
                (fields::textarea("Review", "review_text", &form.review_text, "Write your review here...", errors))
                button type="submit" { "Submit review" }
                " "
                a href={ "/book/" (book.id) "/" } { "Cancel" }
            }
        },
    )
}
