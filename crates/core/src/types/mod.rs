//! Core types for Cooperativa.
//!
//! This module provides type-safe wrappers for common domain concepts.

/// Implements `sqlx` `Type`, `Encode` and `Decode` for a validated string
/// newtype stored as `TEXT`/`VARCHAR`.
///
/// Decoding re-runs `parse`, so a malformed stored value surfaces as a
/// column decode error instead of a silently invalid value.
macro_rules! impl_text_postgres {
    ($name:ident) => {
        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <String as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <String as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let s = <String as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self::parse(&s)?)
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::core::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <String as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

pub mod email;
pub mod id;
pub mod phone;
pub mod tax_id;
pub mod validation;

pub use email::{Email, EmailError};
pub use id::*;
pub use phone::{PhoneNumber, PhoneNumberError};
pub use tax_id::{TaxId, TaxIdError};
pub use validation::{
    EMAIL_PATTERN, Field, PHONE_NUMBER_PATTERN, TAX_ID_PATTERN, ValidationError, is_valid_email,
    is_valid_phone_number, is_valid_tax_id, validate_field,
};
