//! Person repository for database operations.

use sqlx::PgPool;
use tracing::instrument;

use cooperativa_core::PersonId;

use super::RepositoryError;
use super::mappers::{PERSON_COLUMNS, PersonRow};
use crate::models::{NewPerson, Person};

/// Repository for person database operations.
pub struct PersonRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PersonRepository<'a> {
    /// Create a new person repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a person and return it with its generated id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the tax id already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, person), fields(tax_id = %person.tax_id))]
    pub async fn create(&self, person: &NewPerson) -> Result<Person, RepositoryError> {
        let row = sqlx::query_as::<_, PersonRow>(
            r"
            INSERT INTO personas (cif_nif, nombre_razon_social, apellidos, direccion, telefono, email)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id_persona, cif_nif, nombre_razon_social, apellidos, direccion, telefono, email
            ",
        )
        .bind(&person.tax_id)
        .bind(&person.name)
        .bind(&person.last_name)
        .bind(&person.address)
        .bind(&person.phone)
        .bind(&person.email)
        .fetch_one(self.pool)
        .await?;

        row.try_into()
    }

    /// Get a person by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored field is invalid.
    pub async fn get_by_id(&self, id: PersonId) -> Result<Option<Person>, RepositoryError> {
        let sql = format!("SELECT {PERSON_COLUMNS} FROM personas p WHERE p.id_persona = $1");
        let row = sqlx::query_as::<_, PersonRow>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Delete a person. Fails with a conflict while a farmer row references it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a farmer still references the person.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: PersonId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM personas WHERE id_persona = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
