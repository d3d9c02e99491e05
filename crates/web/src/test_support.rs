//! In-memory [`FarmerStore`] for unit and router tests.

#![allow(clippy::expect_used)]

use std::sync::Mutex;

use cooperativa_core::{MemberNumber, PersonId};

use crate::db::{FarmerStore, RepositoryError};
use crate::models::{Farmer, FarmerListing, FarmerProfile, NewPerson, Person, PersonInput};

#[derive(Default)]
struct Tables {
    persons: Vec<Person>,
    farmers: Vec<(MemberNumber, Farmer)>,
    next_person_id: i32,
    next_member_number: i32,
}

/// Store backed by two vectors, mirroring the `personas`/`agricultores`
/// constraints (unique tax id, farmer requires an existing person).
#[derive(Default)]
pub struct InMemoryFarmerStore {
    tables: Mutex<Tables>,
    unavailable: bool,
}

impl InMemoryFarmerStore {
    /// A store whose every call fails as if the database were down.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Insert a person without a farmer row.
    pub fn insert_person(&self, person: &NewPerson) -> Person {
        let mut tables = self.tables.lock().expect("store lock");
        insert_person(&mut tables, person)
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.unavailable {
            return Err(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn insert_person(tables: &mut Tables, person: &NewPerson) -> Person {
    tables.next_person_id += 1;
    let stored = Person {
        id: PersonId::new(tables.next_person_id),
        tax_id: person.tax_id.clone(),
        name: person.name.clone(),
        last_name: person.last_name.clone(),
        address: person.address.clone(),
        phone: person.phone.clone(),
        email: person.email.clone(),
    };
    tables.persons.push(stored.clone());
    stored
}

fn listing(person: &Person, member_number: MemberNumber, farmer: &Farmer) -> FarmerListing {
    FarmerListing {
        person_id: person.id,
        member_number,
        drop_out: farmer.drop_out,
        tax_id: person.tax_id.to_string(),
        name: person.name.clone(),
        last_name: person.last_name.clone(),
        address: person.address.clone(),
        phone: person.phone.as_ref().map(ToString::to_string),
        email: person.email.as_ref().map(ToString::to_string),
    }
}

fn profile(tables: &Tables, person_id: PersonId) -> Option<FarmerProfile> {
    let (member_number, farmer) = tables
        .farmers
        .iter()
        .find(|(_, f)| f.person_id == person_id)?;
    let person = tables.persons.iter().find(|p| p.id == person_id)?;
    Some(FarmerProfile {
        member_number: *member_number,
        farmer: *farmer,
        person: person.clone(),
    })
}

impl FarmerStore for InMemoryFarmerStore {
    async fn search(&self, term: &str) -> Result<Vec<FarmerListing>, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.lock().expect("store lock");
        let mut rows: Vec<FarmerListing> = tables
            .farmers
            .iter()
            .filter_map(|(member_number, farmer)| {
                let person = tables.persons.iter().find(|p| p.id == farmer.person_id)?;
                Some(listing(person, *member_number, farmer))
            })
            .filter(|row| term.is_empty() || row.matches(term))
            .collect();
        rows.sort_by_key(|row| row.member_number.as_i32());
        Ok(rows)
    }

    async fn create(&self, farmer: &Farmer) -> Result<bool, RepositoryError> {
        self.check_available()?;
        let mut tables = self.tables.lock().expect("store lock");
        if !tables.persons.iter().any(|p| p.id == farmer.person_id) {
            return Err(RepositoryError::Conflict(
                "violates foreign key constraint".to_owned(),
            ));
        }
        if tables.farmers.iter().any(|(_, f)| f.person_id == farmer.person_id) {
            return Err(RepositoryError::Conflict(
                "duplicate key value violates unique constraint".to_owned(),
            ));
        }
        tables.next_member_number += 1;
        let member_number = MemberNumber::new(tables.next_member_number);
        tables.farmers.push((member_number, *farmer));
        Ok(true)
    }

    async fn drop_out(&self, person_id: PersonId) -> Result<bool, RepositoryError> {
        self.check_available()?;
        let mut tables = self.tables.lock().expect("store lock");
        match tables
            .farmers
            .iter_mut()
            .find(|(_, f)| f.person_id == person_id)
        {
            Some((_, farmer)) => {
                farmer.drop_out = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn read(&self, person_id: PersonId) -> Result<Farmer, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.lock().expect("store lock");
        tables
            .farmers
            .iter()
            .find(|(_, f)| f.person_id == person_id)
            .map(|(_, f)| *f)
            .ok_or(RepositoryError::NotFound)
    }

    async fn read_profile(&self, person_id: PersonId) -> Result<FarmerProfile, RepositoryError> {
        self.check_available()?;
        let tables = self.tables.lock().expect("store lock");
        profile(&tables, person_id).ok_or(RepositoryError::NotFound)
    }

    async fn enroll(&self, person: &NewPerson) -> Result<FarmerProfile, RepositoryError> {
        self.check_available()?;
        let mut tables = self.tables.lock().expect("store lock");
        if tables.persons.iter().any(|p| p.tax_id == person.tax_id) {
            return Err(RepositoryError::Conflict(
                "duplicate key value violates unique constraint".to_owned(),
            ));
        }
        let stored = insert_person(&mut tables, person);
        tables.next_member_number += 1;
        let member_number = MemberNumber::new(tables.next_member_number);
        tables.farmers.push((member_number, Farmer::new(stored.id)));
        profile(&tables, stored.id).ok_or(RepositoryError::NotFound)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_available()
    }
}

/// A valid person with the given tax id and name.
pub fn sample_person(tax_id: &str, name: &str) -> NewPerson {
    NewPerson::try_from(PersonInput {
        tax_id: tax_id.to_owned(),
        name: name.to_owned(),
        last_name: Some("Troya".to_owned()),
        address: Some("C/hola".to_owned()),
        phone: Some("956123456".to_owned()),
        email: Some("meritorio@meritocracia.es".to_owned()),
    })
    .expect("valid person")
}
