//! Database operations for the cooperative `PostgreSQL` store.
//!
//! ## Tables
//!
//! - `personas` - Identity and contact data (`id_persona`, `cif_nif`,
//!   `nombre_razon_social`, `apellidos`, `direccion`, `telefono`, `email`)
//! - `agricultores` - Farmers (`id_persona`, `baja`, `n_socio`), one per person
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p cooperativa-cli -- migrate
//! ```
//!
//! Every operation is a single statement; the store's own statement
//! atomicity is the only transaction boundary.

pub mod farmers;
pub mod mappers;
pub mod persons;

use std::future::Future;
use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use cooperativa_core::PersonId;

use crate::models::{Farmer, FarmerListing, FarmerProfile, NewPerson};

pub use farmers::FarmerRepository;
pub use persons::PersonRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Connectivity or statement failure reported by sqlx.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// A result row lacked a column or held a value of the wrong type.
    #[error("cannot map column {column}: {reason}")]
    Mapping {
        /// Column name (or index) that failed.
        column: String,
        /// Decoder message.
        reason: String,
    },

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (duplicate key or missing referenced row).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::ColumnNotFound(column) => Self::Mapping {
                reason: "column not present in result".to_owned(),
                column,
            },
            sqlx::Error::ColumnDecode { index, source } => Self::Mapping {
                column: index,
                reason: source.to_string(),
            },
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(ref db_err)
                if db_err.is_unique_violation() || db_err.is_foreign_key_violation() =>
            {
                Self::Conflict(db_err.message().to_owned())
            }
            other => Self::Database(other),
        }
    }
}

/// Data access for farmers and their person records.
///
/// [`FarmerRepository`] is the `PostgreSQL` implementation. Services and
/// handlers are generic over this trait so they can be composed with any
/// store.
pub trait FarmerStore: Send + Sync + 'static {
    /// List farmers joined with their person data.
    ///
    /// An empty `term` returns every farmer. Otherwise returns the rows where
    /// any searchable column contains `term` (case-sensitive).
    fn search(
        &self,
        term: &str,
    ) -> impl Future<Output = Result<Vec<FarmerListing>, RepositoryError>> + Send;

    /// Insert a farmer row for an existing person.
    ///
    /// Returns `true` iff exactly one row was inserted.
    fn create(&self, farmer: &Farmer)
    -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    /// Set the drop-out flag of the farmer with `person_id`.
    ///
    /// Returns `true` iff a row was updated.
    fn drop_out(
        &self,
        person_id: PersonId,
    ) -> impl Future<Output = Result<bool, RepositoryError>> + Send;

    /// Read exactly one farmer, or fail with [`RepositoryError::NotFound`].
    fn read(
        &self,
        person_id: PersonId,
    ) -> impl Future<Output = Result<Farmer, RepositoryError>> + Send;

    /// Read a farmer joined with its person, or fail with
    /// [`RepositoryError::NotFound`].
    fn read_profile(
        &self,
        person_id: PersonId,
    ) -> impl Future<Output = Result<FarmerProfile, RepositoryError>> + Send;

    /// Store a new person together with an active farmer row.
    fn enroll(
        &self,
        person: &NewPerson,
    ) -> impl Future<Output = Result<FarmerProfile, RepositoryError>> + Send;

    /// Check that the store is reachable.
    fn ping(&self) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
