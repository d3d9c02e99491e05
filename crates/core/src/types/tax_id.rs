//! Spanish tax identifier (CIF / NIF / NIE).

use core::fmt;

use serde::{Deserialize, Serialize};

use super::validation::TAX_ID_RE;

/// Errors that can occur when parsing a [`TaxId`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum TaxIdError {
    #[error("tax id cannot be empty")]
    Empty,
    #[error("invalid tax id: {0}")]
    InvalidFormat(String),
}

/// A tax identifier, normalized to upper case.
///
/// Only the shape is checked; control letters are not recomputed.
///
/// ```
/// use cooperativa_core::TaxId;
///
/// let nif = TaxId::parse("54129784s").unwrap();
/// assert_eq!(nif.as_str(), "54129784S");
/// assert!(TaxId::parse("1234").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct TaxId(String);

impl TaxId {
    /// Parse a `TaxId` from a string, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank or does not match the tax id
    /// pattern.
    pub fn parse(s: &str) -> Result<Self, TaxIdError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(TaxIdError::Empty);
        }

        if !TAX_ID_RE.is_match(trimmed) {
            return Err(TaxIdError::InvalidFormat(s.to_owned()));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TaxId {
    type Err = TaxIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TaxId {
    type Error = TaxIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TaxId> for String {
    fn from(tax_id: TaxId) -> Self {
        tax_id.0
    }
}

impl AsRef<str> for TaxId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl_text_postgres!(TaxId);
