//! Business logic services.
//!
//! # Services
//!
//! - `farmers` - Farmer listing, enrollment, drop-out and lookup

pub mod farmers;

pub use farmers::FarmerService;
