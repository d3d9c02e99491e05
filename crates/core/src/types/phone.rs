//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::validation::PHONE_NUMBER_RE;

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneNumberError {
    #[error("phone number cannot be empty")]
    Empty,
    #[error("invalid phone number: {0}")]
    InvalidFormat(String),
}

/// A Spanish phone number.
///
/// Whitespace is stripped before matching, so `"956 12 34 56"` is stored as
/// `"956123456"`.
///
/// ```
/// use cooperativa_core::PhoneNumber;
///
/// let phone = PhoneNumber::parse("956 12 34 56").unwrap();
/// assert_eq!(phone.as_str(), "956123456");
/// assert!(PhoneNumber::parse("12345").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a `PhoneNumber` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is blank or does not match the phone
    /// number pattern after whitespace removal.
    pub fn parse(s: &str) -> Result<Self, PhoneNumberError> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();

        if compact.is_empty() {
            return Err(PhoneNumberError::Empty);
        }

        if !PHONE_NUMBER_RE.is_match(&compact) {
            return Err(PhoneNumberError::InvalidFormat(s.to_owned()));
        }

        Ok(Self(compact))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl_text_postgres!(PhoneNumber);
