use std::sync::Arc;

use crate::config::ServerConfig;
use crate::media::MediaStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: bookreview_db::DbPool,
    /// Server configuration (session secret, cookie flags, limits).
    pub config: Arc<ServerConfig>,
    /// Cover image storage.
    pub media: Arc<MediaStore>,
}
