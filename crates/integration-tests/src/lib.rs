//! Integration tests for Cooperativa.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate the test database
//! COOP_DATABASE_URL=$COOP_TEST_DATABASE_URL cargo run -p cooperativa-cli -- migrate
//!
//! # Database tests
//! COOP_TEST_DATABASE_URL=postgres://... cargo test -p cooperativa-integration-tests -- --ignored
//!
//! # HTTP tests (server running on COOP_BASE_URL, default http://localhost:3000)
//! cargo run -p cooperativa-web &
//! cargo test -p cooperativa-integration-tests --test http_api -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `farmer_repository` - Store operations against a live `PostgreSQL`
//! - `http_api` - Endpoints of a running web server

#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use secrecy::SecretString;
use sqlx::PgPool;

use cooperativa_core::PersonId;
use cooperativa_web::db::{self, FarmerRepository, PersonRepository};
use cooperativa_web::models::{NewPerson, Person, PersonInput};

/// Base URL of a running web server.
#[must_use]
pub fn base_url() -> String {
    std::env::var("COOP_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Connect to the test database named by `COOP_TEST_DATABASE_URL`.
pub async fn test_pool() -> PgPool {
    let url = std::env::var("COOP_TEST_DATABASE_URL")
        .map(SecretString::from)
        .expect("COOP_TEST_DATABASE_URL not set");
    db::create_pool(&url)
        .await
        .expect("Failed to connect to test database")
}

/// A DNI-shaped tax id that is unique within and across test runs.
#[must_use]
pub fn unique_tax_id() -> String {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    let n = (nanos / 100 + COUNTER.fetch_add(1, Ordering::Relaxed) * 7919 + std::process::id())
        % 100_000_000;
    format!("{n:08}T")
}

/// Sample person data with a fresh tax id.
#[must_use]
pub fn sample_person(name: &str) -> NewPerson {
    NewPerson::try_from(PersonInput {
        tax_id: unique_tax_id(),
        name: name.to_string(),
        last_name: Some("Troya".to_string()),
        address: Some("C/hola".to_string()),
        phone: Some("956123456".to_string()),
        email: Some("meritorio@meritocracia.es".to_string()),
    })
    .expect("sample person is valid")
}

/// Database handles for one test, with cleanup helpers.
pub struct TestContext {
    pub pool: PgPool,
    pub farmers: FarmerRepository,
}

impl TestContext {
    /// Connect to the test database.
    pub async fn new() -> Self {
        let pool = test_pool().await;
        Self {
            farmers: FarmerRepository::new(pool.clone()),
            pool,
        }
    }

    /// Insert a person (no farmer row).
    pub async fn insert_person(&self, person: &NewPerson) -> Person {
        PersonRepository::new(&self.pool)
            .create(person)
            .await
            .expect("Failed to insert person")
    }

    /// Remove the farmer and person rows for `person_id`.
    ///
    /// Missing rows are fine; a failed delete panics so leftovers never go
    /// unnoticed. Returns whether a person row was removed.
    pub async fn cleanup(&self, person_id: PersonId) -> bool {
        self.farmers
            .delete(person_id)
            .await
            .expect("Failed to delete farmer row");
        PersonRepository::new(&self.pool)
            .delete(person_id)
            .await
            .expect("Failed to delete person row")
    }
}
