//! CLI subcommands.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Neither `COOP_DATABASE_URL` nor `DATABASE_URL` is set.
#[derive(Debug, thiserror::Error)]
#[error("COOP_DATABASE_URL (or DATABASE_URL) not set")]
pub struct MissingDatabaseUrl;

/// Read the database URL, loading `.env` first.
///
/// # Errors
///
/// Returns `MissingDatabaseUrl` if neither variable is set.
pub fn database_url() -> Result<SecretString, MissingDatabaseUrl> {
    dotenvy::dotenv().ok();

    std::env::var("COOP_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| MissingDatabaseUrl)
}
