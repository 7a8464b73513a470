//! Command-line interface for the `bookreview-web` binary.

use bookreview_core::accounts::{password_problems, validate_username};
use bookreview_db::models::user::{CreateUser, User};
use bookreview_db::repositories::UserRepo;
use bookreview_db::DbPool;
use clap::{Args, Parser, Subcommand};

use crate::auth::password::hash_password;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the web server (the default).
    Serve,
    /// Create a staff account that can use the admin console.
    CreateStaff(CreateStaffArgs),
}

#[derive(Args, Debug, Clone)]
pub struct CreateStaffArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Debug, thiserror::Error)]
pub enum CreateStaffError {
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Weak password: {}", .0.join(" "))]
    WeakPassword(Vec<String>),

    #[error("A user named {0:?} already exists")]
    UsernameTaken(String),

    #[error("Password hashing error: {0}")]
    Hash(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create a staff user, applying the same username and password rules as
/// the sign-up form.
pub async fn create_staff(pool: &DbPool, args: &CreateStaffArgs) -> Result<User, CreateStaffError> {
    let username = args.username.trim();
    let email = args.email.trim();

    validate_username(username).map_err(CreateStaffError::InvalidUsername)?;
    let problems = password_problems(&args.password, username, email);
    if !problems.is_empty() {
        return Err(CreateStaffError::WeakPassword(problems));
    }
    if UserRepo::username_taken(pool, username).await? {
        return Err(CreateStaffError::UsernameTaken(username.to_string()));
    }

    let password_hash =
        hash_password(&args.password).map_err(|e| CreateStaffError::Hash(e.to_string()))?;
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            password_hash,
            is_staff: true,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Staff user created");
    Ok(user)
}
