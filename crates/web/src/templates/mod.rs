//! Server-rendered HTML pages, built with maud.
//!
//! Every page goes through [`layout::page`] (or [`layout::document`] when no
//! request context is available, as for error pages). Interpolated values are
//! escaped by maud.

pub mod admin;
pub mod auth;
pub mod books;
pub mod errors;
pub mod fields;
pub mod layout;
pub mod reviews;

use bookreview_core::types::Timestamp;
use chrono::NaiveDate;

/// `Mar 1, 1969`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// `Mar 1, 2025, 14:05` (UTC)
pub fn format_timestamp(ts: Timestamp) -> String {
    ts.format("%b %-d, %Y, %H:%M").to_string()
}
