//! Row types and their conversion into domain models.
//!
//! Rows are decoded by column name through `sqlx::FromRow`. A missing column
//! or a type mismatch surfaces as [`RepositoryError::Mapping`] (see the
//! `From<sqlx::Error>` impl); a stored value that breaks its format rule
//! surfaces as [`RepositoryError::DataCorruption`].

use cooperativa_core::{Email, MemberNumber, PersonId, PhoneNumber, TaxId};

use super::RepositoryError;
use crate::models::{Farmer, FarmerProfile, Person};

/// Columns selected for a `personas` row.
pub const PERSON_COLUMNS: &str =
    "p.id_persona, p.cif_nif, p.nombre_razon_social, p.apellidos, p.direccion, p.telefono, p.email";

// =============================================================================
// Internal Row Types
// =============================================================================

/// Row of `agricultores`.
#[derive(Debug, sqlx::FromRow)]
pub struct FarmerRow {
    pub id_persona: i32,
    pub baja: bool,
}

impl From<FarmerRow> for Farmer {
    fn from(row: FarmerRow) -> Self {
        Self {
            person_id: PersonId::new(row.id_persona),
            drop_out: row.baja,
        }
    }
}

/// Row of `personas`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PersonRow {
    pub id_persona: i32,
    pub cif_nif: String,
    pub nombre_razon_social: String,
    pub apellidos: Option<String>,
    pub direccion: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
}

impl TryFrom<PersonRow> for Person {
    type Error = RepositoryError;

    fn try_from(row: PersonRow) -> Result<Self, Self::Error> {
        let tax_id = TaxId::parse(&row.cif_nif).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid cif_nif in database: {e}"))
        })?;

        let phone = blank_to_none(row.telefono)
            .map(|p| PhoneNumber::parse(&p))
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid telefono in database: {e}"))
            })?;

        let email = blank_to_none(row.email)
            .map(|e| Email::parse(&e))
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
            })?;

        Ok(Self {
            id: PersonId::new(row.id_persona),
            tax_id,
            name: row.nombre_razon_social,
            last_name: blank_to_none(row.apellidos),
            address: blank_to_none(row.direccion),
            phone,
            email,
        })
    }
}

/// Farmer joined with its person.
#[derive(Debug, sqlx::FromRow)]
pub struct FarmerProfileRow {
    pub n_socio: i32,
    pub baja: bool,
    #[sqlx(flatten)]
    pub person: PersonRow,
}

impl TryFrom<FarmerProfileRow> for FarmerProfile {
    type Error = RepositoryError;

    fn try_from(row: FarmerProfileRow) -> Result<Self, Self::Error> {
        let person = Person::try_from(row.person)?;

        Ok(Self {
            member_number: MemberNumber::new(row.n_socio),
            farmer: Farmer {
                person_id: person.id,
                drop_out: row.baja,
            },
            person,
        })
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
