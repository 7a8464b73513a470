//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- signed session tokens carried in the session cookie.
//! - [`cookies`] -- `Cookie` header parsing and `Set-Cookie` rendering.

pub mod cookies;
pub mod password;
pub mod session;
