//! Domain models for the web application.

pub mod farmer;
pub mod person;

pub use farmer::{Farmer, FarmerListing, FarmerProfile};
pub use person::{NewPerson, Person, PersonInput};
