//! Farmer domain models.

use serde::{Deserialize, Serialize};

use cooperativa_core::{Field, MemberNumber, PersonId, validate_field};

use super::person::Person;

/// A cooperative member (row of `agricultores`).
///
/// Serialized with the field names the HTTP layer binds (`personId`, `dropOut`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Farmer {
    pub person_id: PersonId,
    /// `baja`: the farmer has left the cooperative. The row is kept.
    #[serde(default)]
    pub drop_out: bool,
}

impl Farmer {
    /// An active farmer for an existing person.
    #[must_use]
    pub const fn new(person_id: PersonId) -> Self {
        Self {
            person_id,
            drop_out: false,
        }
    }
}

/// A farmer joined with its person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerProfile {
    pub member_number: MemberNumber,
    pub farmer: Farmer,
    pub person: Person,
}

/// One row of the farmer search: the farmer/person join flattened.
///
/// Serializes as a map keyed by column name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct FarmerListing {
    #[serde(rename = "id_persona")]
    #[sqlx(rename = "id_persona")]
    pub person_id: PersonId,
    #[serde(rename = "n_socio")]
    #[sqlx(rename = "n_socio")]
    pub member_number: MemberNumber,
    #[serde(rename = "baja")]
    #[sqlx(rename = "baja")]
    pub drop_out: bool,
    #[serde(rename = "cif_nif")]
    #[sqlx(rename = "cif_nif")]
    pub tax_id: String,
    #[serde(rename = "nombre_razon_social")]
    #[sqlx(rename = "nombre_razon_social")]
    pub name: String,
    #[serde(rename = "apellidos")]
    #[sqlx(rename = "apellidos")]
    pub last_name: Option<String>,
    #[serde(rename = "direccion")]
    #[sqlx(rename = "direccion")]
    pub address: Option<String>,
    #[serde(rename = "telefono")]
    #[sqlx(rename = "telefono")]
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl FarmerListing {
    /// Column names of the searchable fields, in query order.
    pub const SEARCH_COLUMNS: [&'static str; 7] = [
        "n_socio",
        "cif_nif",
        "nombre_razon_social",
        "apellidos",
        "direccion",
        "telefono",
        "email",
    ];

    /// Text value of a column, by column name.
    ///
    /// Returns `None` for unknown columns and for `NULL` values.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<String> {
        match name {
            "id_persona" => Some(self.person_id.to_string()),
            "n_socio" => Some(self.member_number.to_string()),
            "baja" => Some(self.drop_out.to_string()),
            "cif_nif" => Some(self.tax_id.clone()),
            "nombre_razon_social" => Some(self.name.clone()),
            "apellidos" => self.last_name.clone(),
            "direccion" => self.address.clone(),
            "telefono" => self.phone.clone(),
            "email" => self.email.clone(),
            _ => None,
        }
    }

    /// Returns `true` if any searchable column contains `term`.
    ///
    /// Case-sensitive, like the store's `LIKE`. An empty term matches.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        Self::SEARCH_COLUMNS
            .iter()
            .filter_map(|column| self.column(column))
            .any(|value| value.contains(term))
    }

    /// Validated fields whose stored value breaks its format rule.
    #[must_use]
    pub fn invalid_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| {
                self.column(field.column())
                    .is_some_and(|value| !validate_field(*field, &value))
            })
            .collect()
    }
}
