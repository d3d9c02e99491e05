//! Format rules for person contact fields.
//!
//! The patterns are anchored and must match the whole value. The `is_valid_*`
//! predicates treat an empty value as valid: a field that was never filled in
//! has nothing to check. Use the [`Email`](super::Email),
//! [`PhoneNumber`](super::PhoneNumber) and [`TaxId`](super::TaxId) newtypes
//! when a value is required.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::email::EmailError;
use super::phone::PhoneNumberError;
use super::tax_id::TaxIdError;

/// Email address: local part, `@`, dot-separated domain ending in a TLD of
/// two or more letters.
pub const EMAIL_PATTERN: &str =
    r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$";

/// Spanish phone number: optional `+34`/`0034` prefix, nine digits starting
/// with 6, 7, 8 or 9.
pub const PHONE_NUMBER_PATTERN: &str = r"^(?:\+34|0034)?[6789][0-9]{8}$";

/// Spanish tax identifier, case-insensitive.
///
/// - NIF: 8 digits and a letter (`54129784S`)
/// - NIE: `X`, `Y` or `Z`, 7 digits and a letter
/// - CIF: organisation letter, 7 digits and a control digit or letter
pub const TAX_ID_PATTERN: &str =
    r"^(?i:[0-9]{8}[A-Z]|[XYZ][0-9]{7}[A-Z]|[ABCDEFGHJNPQRSUVW][0-9]{7}[0-9A-J])$";

pub(crate) static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("Invalid regex"));

pub(crate) static PHONE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_NUMBER_PATTERN).expect("Invalid regex"));

pub(crate) static TAX_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(TAX_ID_PATTERN).expect("Invalid regex"));

/// A person field that carries a format rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Email,
    PhoneNumber,
    TaxId,
}

impl Field {
    /// All validated fields.
    pub const ALL: [Self; 3] = [Self::Email, Self::PhoneNumber, Self::TaxId];

    /// Column name in the `personas` table.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::PhoneNumber => "telefono",
            Self::TaxId => "cif_nif",
        }
    }

    /// The pattern this field must match.
    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::Email => EMAIL_PATTERN,
            Self::PhoneNumber => PHONE_NUMBER_PATTERN,
            Self::TaxId => TAX_ID_PATTERN,
        }
    }

    fn regex(self) -> &'static Regex {
        match self {
            Self::Email => &EMAIL_RE,
            Self::PhoneNumber => &PHONE_NUMBER_RE,
            Self::TaxId => &TAX_ID_RE,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Errors raised when a person field fails its format rule.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ValidationError {
    #[error(transparent)]
    Email(#[from] EmailError),
    #[error(transparent)]
    PhoneNumber(#[from] PhoneNumberError),
    #[error(transparent)]
    TaxId(#[from] TaxIdError),
    /// A required field was absent or blank.
    #[error("{0} is required")]
    MissingField(&'static str),
    /// A free-text field exceeds its column width.
    #[error("{field} cannot be longer than {max} characters")]
    TooLong { field: &'static str, max: usize },
}

/// Check `value` against the rule for `field`. Empty values pass.
#[must_use]
pub fn validate_field(field: Field, value: &str) -> bool {
    value.is_empty() || field.regex().is_match(value)
}

/// Returns `true` if `value` is empty or a well-formed email address.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    validate_field(Field::Email, value)
}

/// Returns `true` if `value` is empty or a well-formed phone number.
#[must_use]
pub fn is_valid_phone_number(value: &str) -> bool {
    validate_field(Field::PhoneNumber, value)
}

/// Returns `true` if `value` is empty or a well-formed tax identifier.
#[must_use]
pub fn is_valid_tax_id(value: &str) -> bool {
    validate_field(Field::TaxId, value)
}
