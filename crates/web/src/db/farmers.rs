//! Farmer repository for database operations.
//!
//! Queries are runtime-checked (`sqlx::query` / `sqlx::query_as`) and every
//! caller-supplied value is bound as a parameter.

use sqlx::PgPool;
use tracing::{debug, instrument};

use cooperativa_core::PersonId;

use super::mappers::{FarmerProfileRow, FarmerRow};
use super::{FarmerStore, RepositoryError};
use crate::models::{Farmer, FarmerListing, FarmerProfile, NewPerson};

/// Every farmer joined with its person.
const LIST_ALL_SQL: &str = r"
    SELECT a.id_persona, a.n_socio, a.baja,
           p.cif_nif, p.nombre_razon_social, p.apellidos,
           p.direccion, p.telefono, p.email
    FROM personas p
    JOIN agricultores a ON (p.id_persona = a.id_persona)
    ORDER BY a.n_socio
";

/// Same join filtered by one `LIKE` pattern (`$1`) tested against the seven
/// searchable columns.
const SEARCH_SQL: &str = r"
    SELECT a.id_persona, a.n_socio, a.baja,
           p.cif_nif, p.nombre_razon_social, p.apellidos,
           p.direccion, p.telefono, p.email
    FROM personas p
    JOIN agricultores a ON (p.id_persona = a.id_persona)
    WHERE CAST(a.n_socio AS TEXT) LIKE $1 ESCAPE '\'
       OR p.cif_nif LIKE $1 ESCAPE '\'
       OR p.nombre_razon_social LIKE $1 ESCAPE '\'
       OR p.apellidos LIKE $1 ESCAPE '\'
       OR p.direccion LIKE $1 ESCAPE '\'
       OR p.telefono LIKE $1 ESCAPE '\'
       OR p.email LIKE $1 ESCAPE '\'
    ORDER BY a.n_socio
";

const PROFILE_SQL: &str = r"
    SELECT a.n_socio, a.baja,
           p.id_persona, p.cif_nif, p.nombre_razon_social, p.apellidos,
           p.direccion, p.telefono, p.email
    FROM agricultores a
    JOIN personas p ON (p.id_persona = a.id_persona)
    WHERE a.id_persona = $1
";

/// Inserts the person and its farmer row in one statement.
const ENROLL_SQL: &str = r"
    WITH new_person AS (
        INSERT INTO personas (cif_nif, nombre_razon_social, apellidos, direccion, telefono, email)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id_persona, cif_nif, nombre_razon_social, apellidos, direccion, telefono, email
    ),
    new_farmer AS (
        INSERT INTO agricultores (id_persona, baja)
        SELECT id_persona, FALSE FROM new_person
        RETURNING id_persona, n_socio, baja
    )
    SELECT f.n_socio, f.baja,
           p.id_persona, p.cif_nif, p.nombre_razon_social, p.apellidos,
           p.direccion, p.telefono, p.email
    FROM new_farmer f
    JOIN new_person p ON (p.id_persona = f.id_persona)
";

/// Build the `LIKE` pattern for a free-text term.
///
/// `\`, `%` and `_` in the term are escaped so they match literally, then the
/// term is wrapped in `%` on both sides.
#[must_use]
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Repository for farmer database operations.
#[derive(Clone)]
pub struct FarmerRepository {
    pool: PgPool,
}

impl FarmerRepository {
    /// Create a new farmer repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Delete the farmer row for `person_id`. The person row is kept.
    ///
    /// Only used to clean up after tests and seeding dry runs; the
    /// application itself never deletes farmers.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, person_id: PersonId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM agricultores WHERE id_persona = $1")
            .bind(person_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl FarmerStore for FarmerRepository {
    #[instrument(skip(self), fields(term_len = term.len()))]
    async fn search(&self, term: &str) -> Result<Vec<FarmerListing>, RepositoryError> {
        let rows = if term.is_empty() {
            sqlx::query_as::<_, FarmerListing>(LIST_ALL_SQL)
                .fetch_all(&self.pool)
                .await?
        } else {
            sqlx::query_as::<_, FarmerListing>(SEARCH_SQL)
                .bind(like_pattern(term))
                .fetch_all(&self.pool)
                .await?
        };

        debug!(rows = rows.len(), "Farmer search complete");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn create(&self, farmer: &Farmer) -> Result<bool, RepositoryError> {
        let result = sqlx::query("INSERT INTO agricultores (id_persona, baja) VALUES ($1, $2)")
            .bind(farmer.person_id)
            .bind(farmer.drop_out)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn drop_out(&self, person_id: PersonId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE agricultores SET baja = TRUE WHERE id_persona = $1")
            .bind(person_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn read(&self, person_id: PersonId) -> Result<Farmer, RepositoryError> {
        let row = sqlx::query_as::<_, FarmerRow>(
            "SELECT id_persona, baja FROM agricultores WHERE id_persona = $1",
        )
        .bind(person_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Farmer::from).ok_or(RepositoryError::NotFound)
    }

    #[instrument(skip(self))]
    async fn read_profile(&self, person_id: PersonId) -> Result<FarmerProfile, RepositoryError> {
        let row = sqlx::query_as::<_, FarmerProfileRow>(PROFILE_SQL)
            .bind(person_id)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or(RepositoryError::NotFound)?.try_into()
    }

    #[instrument(skip(self, person), fields(tax_id = %person.tax_id))]
    async fn enroll(&self, person: &NewPerson) -> Result<FarmerProfile, RepositoryError> {
        let row = sqlx::query_as::<_, FarmerProfileRow>(ENROLL_SQL)
            .bind(&person.tax_id)
            .bind(&person.name)
            .bind(&person.last_name)
            .bind(&person.address)
            .bind(&person.phone)
            .bind(&person.email)
            .fetch_one(&self.pool)
            .await?;

        let profile = FarmerProfile::try_from(row)?;
        debug!(
            person_id = %profile.person.id,
            member_number = %profile.member_number,
            "Farmer enrolled"
        );
        Ok(profile)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
