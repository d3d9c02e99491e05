//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! coop-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `COOP_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Stored in `crates/web/migrations/` and embedded at compile time:
//! ```text
//! migrations/
//! ├── 20260101000001_create_personas.sql
//! └── 20260101000002_create_agricultores.sql
//! ```

use secrecy::ExposeSecret;
use sqlx::PgPool;
use tracing::info;

use super::{MissingDatabaseUrl, database_url};

/// Errors raised while migrating.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error(transparent)]
    MissingEnvVar(#[from] MissingDatabaseUrl),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run the web database migrations.
///
/// # Errors
///
/// Returns `MigrationError` if the URL is missing, the database is
/// unreachable, or a migration fails.
pub async fn run() -> Result<(), MigrationError> {
    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    info!("Running migrations...");
    sqlx::migrate!("../web/migrations").run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
