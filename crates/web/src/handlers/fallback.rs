//! Fallback for requests no route matched.
//!
//! Every page lives at a path ending in `/`. A `GET` or `HEAD` for a page
//! path missing its trailing slash gets a 301 to it (query
//! string kept); anything else is a 404 page.

use axum::http::header::LOCATION;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::routes::is_page_path;

/// Any unmatched route.
pub async fn fallback(method: Method, uri: Uri) -> Response {
    if method == Method::GET || method == Method::HEAD {
        if let Some(target) = slash_redirect(&uri) {
            return (StatusCode::MOVED_PERMANENTLY, [(LOCATION, target)]).into_response();
        }
    }
    AppError::NoRoute.into_response()
}

/// Where to send a request for `uri` if it only lacks a trailing slash.
fn slash_redirect(uri: &Uri) -> Option<String> {
    let path = uri.path();
    if path.ends_with('/') {
        return None;
    }
    let slashed = format!("{path}/");
    if !is_page_path(&slashed) {
        return None;
    }
    match uri.query() {
        Some(query) => Some(format!("{slashed}?{query}")),
        None => Some(slashed),
    }
}
