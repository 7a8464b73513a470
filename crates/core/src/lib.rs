//! Domain types and pure logic shared by the data and web layers.
//!
//! Nothing in this crate touches the database or HTTP; every rule here is
//! exercised by plain unit tests.

pub mod accounts;
pub mod books;
pub mod date_filter;
pub mod error;
pub mod reviews;
pub mod search;
pub mod types;
