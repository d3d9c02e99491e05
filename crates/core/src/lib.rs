//! Cooperativa Core - Shared types library.
//!
//! This crate provides common types used across all Cooperativa components:
//! - `web` - Farmer management site and JSON endpoints
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and validation rules - no I/O, no
//! database access, no HTTP. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, phone numbers and tax ids,
//!   and the field format rules behind them

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
