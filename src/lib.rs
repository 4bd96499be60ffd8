pub mod config;
pub mod controllers;
pub mod error;
pub mod grocery;
pub mod models;
pub mod observability;

pub use config::Config;
pub use error::{MealBuddyError, Result};

/// Apply the embedded migrations to `pool`
pub async fn run_migrations(pool: &sqlx::SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
