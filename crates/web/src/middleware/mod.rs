//! Authentication and authorization extractors.
//!
//! - [`auth::MaybeUser`] -- The session user, if any.
//! - [`auth::AuthUser`] -- Requires a signed-in user (redirects to login).
//! - [`rbac::RequireStaff`] -- Requires a staff account.
//! - [`page::PageContext`] -- Everything the page layout needs.

pub mod auth;
pub mod page;
pub mod rbac;
