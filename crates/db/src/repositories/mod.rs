//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&SqlitePool` as the first argument.

pub mod book_repo;
pub mod review_repo;
pub mod session_repo;
pub mod user_repo;

pub use book_repo::BookRepo;
pub use review_repo::ReviewRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
