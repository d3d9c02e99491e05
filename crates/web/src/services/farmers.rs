//! Farmer service: the layer between HTTP handlers and the farmer store.
//!
//! It only adapts argument shapes and forwards to the store. A missing search
//! term means "list everything"; tax ids are stored upper-cased, so a term
//! shaped like one is upper-cased before searching. Store errors are returned
//! unchanged.

use tracing::instrument;

use cooperativa_core::{PersonId, TaxId};

use crate::db::{FarmerStore, RepositoryError};
use crate::models::{Farmer, FarmerListing, FarmerProfile, NewPerson};

/// Farmer operations over a [`FarmerStore`].
pub struct FarmerService<S> {
    store: S,
}

impl<S: FarmerStore> FarmerService<S> {
    /// Create a new farmer service.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Get a reference to the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// List farmers, optionally filtered by a free-text term.
    ///
    /// # Errors
    ///
    /// Propagates the store error.
    #[instrument(skip(self))]
    pub async fn farmers_list(
        &self,
        text_to_search: Option<&str>,
    ) -> Result<Vec<FarmerListing>, RepositoryError> {
        let term = normalize_term(text_to_search.unwrap_or_default());
        self.store.search(&term).await
    }

    /// Create a farmer for an existing person.
    ///
    /// # Errors
    ///
    /// Propagates the store error.
    #[instrument(skip(self))]
    pub async fn create(&self, farmer: &Farmer) -> Result<bool, RepositoryError> {
        self.store.create(farmer).await
    }

    /// Mark a farmer as dropped out. Only the person id of `farmer` is used.
    ///
    /// # Errors
    ///
    /// Propagates the store error.
    #[instrument(skip(self))]
    pub async fn drop_out(&self, farmer: &Farmer) -> Result<bool, RepositoryError> {
        self.store.drop_out(farmer.person_id).await
    }

    /// Read one farmer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no farmer has `person_id`.
    #[instrument(skip(self))]
    pub async fn read(&self, person_id: PersonId) -> Result<Farmer, RepositoryError> {
        self.store.read(person_id).await
    }

    /// Read one farmer with its person data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no farmer has `person_id`.
    #[instrument(skip(self))]
    pub async fn read_profile(&self, person_id: PersonId) -> Result<FarmerProfile, RepositoryError> {
        self.store.read_profile(person_id).await
    }

    /// Enroll a new person as an active farmer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the tax id is already registered.
    #[instrument(skip(self, person))]
    pub async fn enroll(&self, person: &NewPerson) -> Result<FarmerProfile, RepositoryError> {
        self.store.enroll(person).await
    }
}

/// Upper-case a term that is exactly a tax id; keep anything else verbatim.
fn normalize_term(term: &str) -> String {
    match TaxId::parse(term) {
        Ok(tax_id) if tax_id.as_str().eq_ignore_ascii_case(term) => tax_id.into_inner(),
        _ => term.to_owned(),
    }
}
