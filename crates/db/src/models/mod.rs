//! Row types and DTOs, one module per table.

pub mod book;
pub mod review;
pub mod session;
pub mod user;
