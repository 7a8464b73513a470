//! Book review web application library.
//!
//! Exposes the building blocks (config, state, error handling, forms,
//! templates, routes) so integration tests and the binary entrypoint can
//! both access them.

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod flash;
pub mod forms;
pub mod handlers;
pub mod media;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
pub mod templates;
