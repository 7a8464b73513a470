//! Catalog pages: home, list/search, detail, add/edit and delete.

use bookreview_core::books::{AUTHOR_MAX_LEN, GENRE_MAX_LEN, TITLE_MAX_LEN};
use bookreview_core::reviews::{format_average, stars};
use bookreview_db::models::book::Book;
use bookreview_db::models::review::{RatingSummary, Review, ReviewDetail};
use maud::{html, Markup};

use super::layout::page;
use super::{fields, format_date, format_timestamp};
use crate::forms::book::BookForm;
use crate::forms::FormErrors;
use crate::media;
use crate::middleware::auth::login_url;
use crate::middleware::page::PageContext;

fn search_box(query: Option<&str>) -> Markup {
    html! {
        form.search method="get" action="/books/" {
            input type="search" name="q" value=(query.unwrap_or_default())
                placeholder="Search by title or author";
            button type="submit" { "Search" }
        }
    }
}

fn book_cards(books: &[Book]) -> Markup {
    html! {
        ul.books {
            @for book in books {
                li.book-card {
                    @if let Some(cover) = &book.cover_image {
                        img.cover src=(media::url(cover)) alt={ "Cover of " (book.title) };
                    }
                    h3 { a href={ "/book/" (book.id) "/" } { (book.title) } }
                    p { "by " (book.author) }
                    p.genre { (book.genre) }
                }
            }
        }
    }
}

/// `GET /`
pub fn home(ctx: &PageContext, total: i64, recent: &[Book]) -> Markup {
    page(
        ctx,
        "Home",
        html! {
            h1 { "Welcome to Book Reviews" }
            p { "Browse " (total) " books and share what you think of them." }
            (search_box(None))
            h2 { "Recently added" }
            @if recent.is_empty() {
                p { "No books yet." }
            } @else {
                (book_cards(recent))
            }
            p { a href="/books/" { "See all books" } }
        },
    )
}

/// `GET /books/`
pub fn list(ctx: &PageContext, books: &[Book], query: Option<&str>) -> Markup {
    page(
        ctx,
        "Books",
        html! {
            h1 { "Books" }
            (search_box(query))
            @if let Some(q) = query {
                p.results { (books.len()) " result(s) for \u{201c}" (q) "\u{201d}" }
            }
            @if books.is_empty() {
                p { "No books found." }
            } @else {
                (book_cards(books))
            }
        },
    )
}

/// Everything the detail page shows besides the book itself.
pub struct DetailView<'a> {
    pub book: &'a Book,
    pub reviews: &'a [ReviewDetail],
    pub summary: RatingSummary,
    /// The signed-in user's own review of this book, if any.
    pub own_review: Option<&'a Review>,
}

/// `GET /book/{id}/`
pub fn detail(ctx: &PageContext, view: &DetailView<'_>) -> Markup {
    let book = view.book;
    page(
        ctx,
        &book.title,
        html! {
            article.book {
                @if let Some(cover) = &book.cover_image {
                    img.cover src=(media::url(cover)) alt={ "Cover of " (book.title) };
                }
                h1 { (book.title) }
                p { "by " strong { (book.author) } }
                dl {
                    dt { "Genre" } dd { (book.genre) }
                    dt { "Published" } dd { (format_date(book.publication_date)) }
                    dt { "ISBN" } dd { (book.isbn) }
                }
                @if !book.description.is_empty() {
                    p.description { (book.description) }
                }
                @if ctx.is_authenticated() {
                    p.actions {
                        a href={ "/book/" (book.id) "/edit/" } { "Edit" }
                        " | "
                        a href={ "/book/" (book.id) "/delete/" } { "Delete" }
                    }
                }
            }

            section.reviews {
                h2 { "Reviews (" (view.summary.review_count) ")" }
                @if let Some(avg) = view.summary.average_rating {
                    p.average {
                        "Average rating: "
                        span.stars { (stars(avg.round() as i64)) }
                        " " (format_average(avg)) " / 5"
                    }
                }

                @match (&ctx.user, view.own_review) {
                    (None, _) => {
                        p {
                            a href=(login_url(&format!("/book/{}/", book.id))) { "Log in" }
                            " to write a review."
                        }
                    }
                    (Some(_), Some(review)) => {
                        p.info {
                            "You rated this book " span.stars { (stars(review.rating)) }
                            " on " (format_timestamp(review.created_at)) "."
                        }
                    }
                    (Some(_), None) => {
                        p { a href={ "/book/" (book.id) "/review/" } { "Write a review" } }
                    }
                }

                @if view.reviews.is_empty() {
                    p { "No reviews yet." }
                }
                @for review in view.reviews {
                    div.review {
                        p {
                            strong { (review.username) } " "
                            span.stars title=(review.rating) { (stars(review.rating)) }
                        }
                        p { (review.review_text) }
                        p.meta { small { (format_timestamp(review.created_at)) } }
                    }
                }
            }
        },
    )
}

/// The add/edit form body, shared with the admin change page.
pub fn book_fields(form: &BookForm, errors: &FormErrors, current_cover: Option<&str>) -> Markup {
    html! {
        (fields::non_field_errors(errors))
        (fields::input("text", "Title", "title", &form.title, Some(TITLE_MAX_LEN), errors))
        (fields::input("text", "Author", "author", &form.author, Some(AUTHOR_MAX_LEN), errors))
        (fields::input("text", "Genre", "genre", &form.genre, Some(GENRE_MAX_LEN), errors))
        (fields::input("date", "Publication date", "publication_date", &form.publication_date, None, errors))
        (fields::input("text", "ISBN", "isbn", &form.isbn, None, errors))
        (fields::textarea("Description", "description", &form.description, "", errors))
        @if let Some(cover) = current_cover {
            p.current-cover {
                "Current cover: " a href=(media::url(cover)) { (cover) }
            }
        }
        (fields::file("Cover image", "cover_image", errors))
    }
}

/// `GET|POST /book/add/` and `/book/{id}/edit/`
pub fn form_page(
    ctx: &PageContext,
    heading: &str,
    action: &str,
    form: &BookForm,
    errors: &FormErrors,
    current_cover: Option<&str>,
) -> Markup {
    page(
        ctx,
        heading,
        html! {
            h1 { (heading) }
            form method="post" action=(action) enctype="multipart/form-data" {
                (book_fields(form, errors, current_cover))
                button type="submit" { "Save" }
            }
        },
    )
}

/// `GET /book/{id}/delete/`
pub fn confirm_delete(ctx: &PageContext, book: &Book, review_count: i64) -> Markup {
    page(
        ctx,
        "Delete book",
        html! {
            h1 { "Delete \u{201c}" (book.title) "\u{201d}?" }
            p {
                "This permanently removes the book"
                @if review_count > 0 {
                    " and its " (review_count) " review(s)"
                }
                "."
            }
            form method="post" action={ "/book/" (book.id) "/delete/" } {
                button.danger type="submit" { "Yes, delete it" }
                " "
                a href={ "/book/" (book.id) "/" } { "Cancel" }
            }
        },
    )
}
