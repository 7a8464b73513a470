use axum::http::StatusCode;
use maud::{html, Markup};

use super::layout::document;

/// Standalone error page. Rendered without request context, so the
/// navigation bar always shows the anonymous links.
pub fn error_page(status: StatusCode, message: &str) -> Markup {
    let title = status.canonical_reason().unwrap_or("Error");
    document(
        title,
        None,
        &[],
        html! {
            h1 { (status.as_u16()) " " (title) }
            p { (message) }
            p { a href="/" { "Back to the home page" } }
        },
    )
}
