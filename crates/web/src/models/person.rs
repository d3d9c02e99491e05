//! Person domain models.

use serde::{Deserialize, Serialize};

use cooperativa_core::{Email, PersonId, PhoneNumber, TaxId, ValidationError};

/// A persisted person (row of `personas`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub id: PersonId,
    pub tax_id: TaxId,
    /// Given name or company name (`nombre_razon_social`).
    pub name: String,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<PhoneNumber>,
    pub email: Option<Email>,
}

impl Person {
    /// Name and last name joined for display.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {last}", self.name),
            None => self.name.clone(),
        }
    }
}

/// A validated person that has not been stored yet.
///
/// Can only be built from a [`PersonInput`], so every present email, phone
/// and tax id already matches its format rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPerson {
    pub tax_id: TaxId,
    pub name: String,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<PhoneNumber>,
    pub email: Option<Email>,
}

/// Unvalidated person fields as submitted by a form or a seed file.
///
/// Blank optional fields are treated as absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonInput {
    #[serde(alias = "cif_nif")]
    pub tax_id: String,
    #[serde(alias = "nombre_razon_social")]
    pub name: String,
    #[serde(default, alias = "apellidos")]
    pub last_name: Option<String>,
    #[serde(default, alias = "direccion")]
    pub address: Option<String>,
    #[serde(default, alias = "telefono")]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Width of the `personas` free-text columns (`VARCHAR(255)`).
pub const TEXT_MAX_LENGTH: usize = 255;

impl TryFrom<PersonInput> for NewPerson {
    type Error = ValidationError;

    fn try_from(input: PersonInput) -> Result<Self, Self::Error> {
        let name = non_blank(Some(input.name)).ok_or(ValidationError::MissingField("name"))?;
        check_length("name", Some(name.as_str()))?;
        let last_name = non_blank(input.last_name);
        check_length("lastName", last_name.as_deref())?;
        let address = non_blank(input.address);
        check_length("address", address.as_deref())?;
        let tax_id = TaxId::parse(&input.tax_id)?;
        let phone = non_blank(input.phone)
            .map(|p| PhoneNumber::parse(&p))
            .transpose()?;
        let email = non_blank(input.email)
            .map(|e| Email::parse(&e))
            .transpose()?;

        Ok(Self {
            tax_id,
            name,
            last_name,
            address,
            phone,
            email,
        })
    }
}

fn check_length(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
    match value {
        Some(v) if v.chars().count() > TEXT_MAX_LENGTH => Err(ValidationError::TooLong {
            field,
            max: TEXT_MAX_LENGTH,
        }),
        _ => Ok(()),
    }
}

/// Trim a value, mapping blank to `None`.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_input() -> PersonInput {
        PersonInput {
            tax_id: "54129784s".to_string(),
            name: "Juan".to_string(),
            last_name: Some("Troya".to_string()),
            address: Some("C/hola".to_string()),
            phone: Some("956123456".to_string()),
            email: Some("meritorio@meritocracia.es".to_string()),
        }
    }

    #[test]
    fn test_valid_input_converts() {
        let person = NewPerson::try_from(sample_input()).unwrap();
        assert_eq!(person.tax_id.as_str(), "54129784S");
        assert_eq!(person.name, "Juan");
        assert_eq!(person.phone.unwrap().as_str(), "956123456");
        assert_eq!(person.email.unwrap().as_str(), "meritorio@meritocracia.es");
    }

    #[test]
    fn test_blank_optionals_become_none() {
        let input = PersonInput {
            last_name: Some("  ".to_string()),
            phone: Some(String::new()),
            email: None,
            ..sample_input()
        };
        let person = NewPerson::try_from(input).unwrap();
        assert!(person.last_name.is_none());
        assert!(person.phone.is_none());
        assert!(person.email.is_none());
    }

    #[test]
    fn test_invalid_fields_are_rejected() {
        let bad_email = PersonInput {
            email: Some("meritorio".to_string()),
            ..sample_input()
        };
        assert!(matches!(
            NewPerson::try_from(bad_email),
            Err(ValidationError::Email(_))
        ));

        let bad_phone = PersonInput {
            phone: Some("123".to_string()),
            ..sample_input()
        };
        assert!(matches!(
            NewPerson::try_from(bad_phone),
            Err(ValidationError::PhoneNumber(_))
        ));

        let bad_tax_id = PersonInput {
            tax_id: "nope".to_string(),
            ..sample_input()
        };
        assert!(matches!(
            NewPerson::try_from(bad_tax_id),
            Err(ValidationError::TaxId(_))
        ));
    }

    #[test]
    fn test_missing_name() {
        let input = PersonInput {
            name: " ".to_string(),
            ..sample_input()
        };
        assert!(matches!(
            NewPerson::try_from(input),
            Err(ValidationError::MissingField("name"))
        ));
    }

    #[test]
    fn test_text_fields_fit_their_columns() {
        let at_limit = PersonInput {
            name: "a".repeat(TEXT_MAX_LENGTH),
            address: Some("ñ".repeat(TEXT_MAX_LENGTH)),
            ..sample_input()
        };
        assert!(NewPerson::try_from(at_limit).is_ok());

        let long_name = PersonInput {
            name: "a".repeat(TEXT_MAX_LENGTH + 1),
            ..sample_input()
        };
        assert!(matches!(
            NewPerson::try_from(long_name),
            Err(ValidationError::TooLong { field: "name", max: TEXT_MAX_LENGTH })
        ));

        let long_last_name = PersonInput {
            last_name: Some("b".repeat(TEXT_MAX_LENGTH + 1)),
            ..sample_input()
        };
        assert!(matches!(
            NewPerson::try_from(long_last_name),
            Err(ValidationError::TooLong { field: "lastName", .. })
        ));

        let long_address = PersonInput {
            address: Some("c".repeat(TEXT_MAX_LENGTH + 1)),
            ..sample_input()
        };
        assert!(matches!(
            NewPerson::try_from(long_address),
            Err(ValidationError::TooLong { field: "address", .. })
        ));
    }

    #[test]
    fn test_input_accepts_column_names() {
        let input: PersonInput = serde_json::from_value(serde_json::json!({
            "cif_nif": "54129784S",
            "nombre_razon_social": "Juan",
            "telefono": "956123456"
        }))
        .unwrap();
        assert_eq!(input.tax_id, "54129784S");
        assert_eq!(input.phone.as_deref(), Some("956123456"));
    }

    #[test]
    fn test_full_name() {
        let new = NewPerson::try_from(sample_input()).unwrap();
        let person = Person {
            id: PersonId::new(20),
            tax_id: new.tax_id,
            name: new.name,
            last_name: new.last_name,
            address: new.address,
            phone: new.phone,
            email: new.email,
        };
        assert_eq!(person.full_name(), "Juan Troya");
    }
}
