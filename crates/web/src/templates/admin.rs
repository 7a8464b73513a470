//! Staff console: dashboard, changelists with filter sidebars, change and
//! delete pages for books and reviews.

use bookreview_core::date_filter::DateFilter;
use bookreview_core::reviews::{rating_label, RATING_CHOICES};
use bookreview_db::models::book::Book;
use bookreview_db::models::review::ReviewDetail;
use bookreview_db::models::user::UserRef;
use maud::{html, Markup};

use super::books::book_fields;
use super::fields;
use super::layout::page;
use super::{format_date, format_timestamp};
use crate::forms::book::BookForm;
use crate::forms::filters::{BookListQuery, ReviewListQuery};
use crate::forms::review::ReviewForm;
use crate::forms::FormErrors;
use crate::middleware::page::PageContext;

fn breadcrumbs(trail: &[(&str, &str)], current: &str) -> Markup {
    html! {
        p.breadcrumbs {
            a href="/admin/" { "Admin" }
            @for (label, href) in trail {
                " \u{203a} " a href=(href) { (label) }
            }
            " \u{203a} " (current)
        }
    }
}

/// One sidebar filter group: a heading and a list of links, one marked selected.
fn filter_group(title: &str, options: &[(String, String, bool)]) -> Markup {
    html! {
        h3 { "By " (title) }
        ul {
            @for (label, href, selected) in options {
                li { a href=(href) class=[selected.then_some("selected")] { (label) } }
            }
        }
    }
}

fn search_form(action: &str, q: Option<&str>, hidden: &[(&str, String)]) -> Markup {
    html! {
        form.search method="get" action=(action) {
            input type="search" name="q" value=(q.unwrap_or_default());
            @for (name, value) in hidden {
                input type="hidden" name=(name) value=(value);
            }
            button type="submit" { "Search" }
        }
    }
}

fn date_options(
    current: DateFilter,
    link: impl Fn(DateFilter) -> String,
) -> Vec<(String, String, bool)> {
    DateFilter::ALL
        .iter()
        .map(|f| (f.label().to_string(), link(*f), *f == current))
        .collect()
}

/// `GET /admin/`
pub fn index(ctx: &PageContext, books: i64, reviews: i64, users: i64) -> Markup {
    page(
        ctx,
        "Administration",
        html! {
            h1 { "Site administration" }
            table {
                tr { th { a href="/admin/books/" { "Books" } } td { (books) } }
                tr { th { a href="/admin/reviews/" { "Reviews" } } td { (reviews) } }
                tr { th { "Users" } td { (users) } }
            }
        },
    )
}

/// `GET /admin/books/`
pub fn book_list(ctx: &PageContext, books: &[Book], query: &BookListQuery, genres: &[String]) -> Markup {
    let mut genre_options = vec![(
        "All".to_string(),
        BookListQuery { genre: None, ..query.clone() }.href(),
        query.to_filter().genre.is_none(),
    )];
    genre_options.extend(genres.iter().map(|genre| {
        (
            genre.clone(),
            BookListQuery { genre: Some(genre.clone()), ..query.clone() }.href(),
            query.to_filter().genre.as_deref() == Some(genre.as_str()),
        )
    }));
    let published = date_options(query.published, |f| {
        BookListQuery { published: f, ..query.clone() }.href()
    });
    let created = date_options(query.created, |f| {
        BookListQuery { created: f, ..query.clone() }.href()
    });

    let mut hidden = Vec::new();
    if let Some(genre) = query.to_filter().genre {
        hidden.push(("genre", genre));
    }
    if query.published != DateFilter::Any {
        hidden.push(("published", query.published.slug().to_string()));
    }
    if query.created != DateFilter::Any {
        hidden.push(("created", query.created.slug().to_string()));
    }

    page(
        ctx,
        "Books | Admin",
        html! {
            (breadcrumbs(&[], "Books"))
            h1 { "Select book to change" }
            p { a.button href="/book/add/" { "Add book" } }
            div.admin {
                div.results {
                    (search_form("/admin/books/", query.q.as_deref(), &hidden))
                    p { (books.len()) " book(s)" }
                    table {
                        thead {
                            tr {
                                th { "Title" } th { "Author" } th { "Genre" }
                                th { "Publication date" } th { "Created at" }
                            }
                        }
                        tbody {
                            @for book in books {
                                tr {
                                    td { a href={ "/admin/books/" (book.id) "/" } { (book.title) } }
                                    td { (book.author) }
                                    td { (book.genre) }
                                    td { (format_date(book.publication_date)) }
                                    td { (format_timestamp(book.created_at)) }
                                }
                            }
                        }
                    }
                }
                aside {
                    h2 { "Filter" }
                    (filter_group("genre", &genre_options))
                    (filter_group("publication date", &published))
                    (filter_group("created at", &created))
                }
            }
        },
    )
}

/// `GET|POST /admin/books/{id}/`
pub fn book_change(ctx: &PageContext, book: &Book, form: &BookForm, errors: &FormErrors) -> Markup {
    page(
        ctx,
        "Change book | Admin",
        html! {
            (breadcrumbs(&[("Books", "/admin/books/")], &book.title))
            h1 { "Change book" }
            form method="post" action={ "/admin/books/" (book.id) "/" } enctype="multipart/form-data" {
                (book_fields(form, errors, book.cover_image.as_deref()))
                dl.readonly {
                    dt { "Created at" } dd { (format_timestamp(book.created_at)) }
                    dt { "Updated at" } dd { (format_timestamp(book.updated_at)) }
                }
                button type="submit" { "Save" }
                " "
                a href={ "/admin/books/" (book.id) "/delete/" } { "Delete" }
                " | "
                a href={ "/book/" (book.id) "/" } { "View on site" }
            }
        },
    )
}

/// `GET /admin/books/{id}/delete/`
pub fn book_delete(ctx: &PageContext, book: &Book, review_count: i64) -> Markup {
    page(
        ctx,
        "Delete book | Admin",
        html! {
            (breadcrumbs(&[("Books", "/admin/books/")], "Delete"))
            h1 { "Are you sure?" }
            p {
                "Deleting the book \u{201c}" (book.title) "\u{201d} also deletes "
                (review_count) " related review(s)."
            }
            form method="post" action={ "/admin/books/" (book.id) "/delete/" } {
                button.danger type="submit" { "Yes, I'm sure" }
                " "
                a href={ "/admin/books/" (book.id) "/" } { "No, take me back" }
            }
        },
    )
}

/// `GET /admin/reviews/`
pub fn review_list(
    ctx: &PageContext,
    reviews: &[ReviewDetail],
    query: &ReviewListQuery,
    users: &[UserRef],
) -> Markup {
    let mut rating_options = vec![(
        "All".to_string(),
        ReviewListQuery { rating: None, ..query.clone() }.href(),
        query.rating.is_none(),
    )];
    rating_options.extend(RATING_CHOICES.iter().map(|(value, label)| {
        (
            label.to_string(),
            ReviewListQuery { rating: Some(*value), ..query.clone() }.href(),
            query.rating == Some(*value),
        )
    }));
    let created = date_options(query.created, |f| {
        ReviewListQuery { created: f, ..query.clone() }.href()
    });
    let mut user_options = vec![(
        "All".to_string(),
        ReviewListQuery { user: None, ..query.clone() }.href(),
        query.user.is_none(),
    )];
    user_options.extend(users.iter().map(|user| {
        (
            user.username.clone(),
            ReviewListQuery { user: Some(user.id), ..query.clone() }.href(),
            query.user == Some(user.id),
        )
    }));

    let mut hidden = Vec::new();
    if let Some(rating) = query.rating {
        hidden.push(("rating", rating.to_string()));
    }
    if let Some(user) = query.user {
        hidden.push(("user", user.to_string()));
    }
    if query.created != DateFilter::Any {
        hidden.push(("created", query.created.slug().to_string()));
    }

    page(
        ctx,
        "Reviews | Admin",
        html! {
            (breadcrumbs(&[], "Reviews"))
            h1 { "Select review to change" }
            div.admin {
                div.results {
                    (search_form("/admin/reviews/", query.q.as_deref(), &hidden))
                    p { (reviews.len()) " review(s)" }
                    table {
                        thead {
                            tr { th { "Book" } th { "User" } th { "Rating" } th { "Created at" } }
                        }
                        tbody {
                            @for review in reviews {
                                tr {
                                    td { a href={ "/admin/reviews/" (review.id) "/" } { (review.book_title) } }
                                    td { (review.username) }
                                    td { (rating_label(review.rating).unwrap_or("-")) }
                                    td { (format_timestamp(review.created_at)) }
                                }
                            }
                        }
                    }
                }
                aside {
                    h2 { "Filter" }
                    (filter_group("rating", &rating_options))
                    (filter_group("created at", &created))
                    (filter_group("user", &user_options))
                }
            }
        },
    )
}

/// `GET|POST /admin/reviews/{id}/`
///
/// Book and reviewer are fixed; rating and text are editable.
pub fn review_change(
    ctx: &PageContext,
    review: &ReviewDetail,
    form: &ReviewForm,
    errors: &FormErrors,
) -> Markup {
    page(
        ctx,
        "Change review | Admin",
        html! {
            (breadcrumbs(&[("Reviews", "/admin/reviews/")], &format!("Review #{}", review.id)))
            h1 { "Change review" }
            form method="post" action={ "/admin/reviews/" (review.id) "/" } {
                (fields::non_field_errors(errors))
                dl.readonly {
                    dt { "Book" } dd { a href={ "/book/" (review.book_id) "/" } { (review.book_title) } }
                    dt { "User" } dd { (review.username) }
                }
                (fields::rating_select(&form.rating, errors))
                (fields::textarea("Review text", "review_text", &form.review_text, "", errors))
                dl.readonly {
                    dt { "Created at" } dd { (format_timestamp(review.created_at)) }
                    dt { "Updated at" } dd { (format_timestamp(review.updated_at)) }
                }
                button type="submit" { "Save" }
                " "
                a href={ "/admin/reviews/" (review.id) "/delete/" } { "Delete" }
            }
        },
    )
}

/// `GET /admin/reviews/{id}/delete/`
pub fn review_delete(ctx: &PageContext, review: &ReviewDetail) -> Markup {
    page(
        ctx,
        "Delete review | Admin",
        html! {
            (breadcrumbs(&[("Reviews", "/admin/reviews/")], "Delete"))
            h1 { "Are you sure?" }
            p {
                "Delete the review of \u{201c}" (review.book_title) "\u{201d} by "
                (review.username) "?"
            }
            form method="post" action={ "/admin/reviews/" (review.id) "/delete/" } {
                button.danger type="submit" { "Yes, I'm sure" }
                " "
                a href={ "/admin/reviews/" (review.id) "/" } { "No, take me back" }
            }
        },
    )
}
