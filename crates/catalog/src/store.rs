//! Storage abstraction for catalog records.
//!
//! This module defines the contract that catalog storage backends implement.
//! It makes no storage assumptions: the same interface is served by an
//! in-memory implementation (tests/dev) and a Postgres implementation
//! (production).
//!
//! ## Customer Versioning
//!
//! Customer writes use optimistic concurrency. A customer that has never been
//! persisted is at version `0`; every successful write bumps the version by
//! one, and the store assigns the new version (callers never pick versions).
//! `save_customer` checks the caller's [`ExpectedVersion`] against the stored
//! version and fails with [`StoreError::Conflict`] on mismatch, so concurrent
//! read-modify-write cycles surface as retryable conflicts instead of lost
//! updates.

use std::sync::Arc;

use thiserror::Error;

use wayfarer_core::{CountryId, CustomerId, DivisionId, ExcursionId, ExpectedVersion, VacationId};

use crate::country::{Country, Division};
use crate::customer::Customer;
use crate::vacation::{Excursion, Vacation};

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Catalog store operation error.
///
/// These are **infrastructure errors** (storage, concurrency) as opposed to
/// domain errors (validation, invariants).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Optimistic concurrency check failed or a unique constraint was hit.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The write was rejected by the storage layer (bad reference, bad data).
    #[error("invalid write: {0}")]
    Invalid(String),

    /// The storage backend could not be reached or failed mid-operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable storage for catalog records.
///
/// Countries and divisions are reference data (seeded once, then read-only
/// through the API). Customers, vacations and excursions support full CRUD.
///
/// Implementations must:
/// - enforce optimistic concurrency on customer writes (see module docs)
/// - return listings in a stable order (name or title)
/// - cascade vacation deletes to the vacation's excursions
#[async_trait::async_trait]
pub trait CatalogStore: Send + Sync {
    async fn list_countries(&self) -> StoreResult<Vec<Country>>;
    async fn find_country(&self, id: CountryId) -> StoreResult<Option<Country>>;
    /// Insert a country (seeding only; countries are immutable afterwards).
    async fn save_country(&self, country: Country) -> StoreResult<Country>;

    async fn list_divisions(&self) -> StoreResult<Vec<Division>>;
    async fn find_division(&self, id: DivisionId) -> StoreResult<Option<Division>>;
    /// Insert a division (seeding only; divisions are immutable afterwards).
    async fn save_division(&self, division: Division) -> StoreResult<Division>;

    async fn list_customers(&self) -> StoreResult<Vec<Customer>>;
    async fn find_customer(&self, id: CustomerId) -> StoreResult<Option<Customer>>;
    /// Insert or update a customer under an optimistic concurrency check.
    ///
    /// Returns the stored customer with its newly assigned version.
    async fn save_customer(
        &self,
        customer: Customer,
        expected_version: ExpectedVersion,
    ) -> StoreResult<Customer>;
    async fn delete_customer(&self, id: CustomerId) -> StoreResult<()>;

    async fn list_vacations(&self) -> StoreResult<Vec<Vacation>>;
    async fn find_vacation(&self, id: VacationId) -> StoreResult<Option<Vacation>>;
    async fn save_vacation(&self, vacation: Vacation) -> StoreResult<Vacation>;
    /// Delete a vacation and all excursions attached to it.
    async fn delete_vacation(&self, id: VacationId) -> StoreResult<()>;

    async fn list_excursions(&self) -> StoreResult<Vec<Excursion>>;
    async fn find_excursion(&self, id: ExcursionId) -> StoreResult<Option<Excursion>>;
    async fn save_excursion(&self, excursion: Excursion) -> StoreResult<Excursion>;
    async fn delete_excursion(&self, id: ExcursionId) -> StoreResult<()>;
    async fn excursions_for_vacation(&self, id: VacationId) -> StoreResult<Vec<Excursion>>;
}

#[async_trait::async_trait]
impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    async fn list_countries(&self) -> StoreResult<Vec<Country>> {
        (**self).list_countries().await
    }

    async fn find_country(&self, id: CountryId) -> StoreResult<Option<Country>> {
        (**self).find_country(id).await
    }

    async fn save_country(&self, country: Country) -> StoreResult<Country> {
        (**self).save_country(country).await
    }

    async fn list_divisions(&self) -> StoreResult<Vec<Division>> {
        (**self).list_divisions().await
    }

    async fn find_division(&self, id: DivisionId) -> StoreResult<Option<Division>> {
        (**self).find_division(id).await
    }

    async fn save_division(&self, division: Division) -> StoreResult<Division> {
        (**self).save_division(division).await
    }

    async fn list_customers(&self) -> StoreResult<Vec<Customer>> {
        (**self).list_customers().await
    }

    async fn find_customer(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        (**self).find_customer(id).await
    }

    async fn save_customer(
        &self,
        customer: Customer,
        expected_version: ExpectedVersion,
    ) -> StoreResult<Customer> {
        (**self).save_customer(customer, expected_version).await
    }

    async fn delete_customer(&self, id: CustomerId) -> StoreResult<()> {
        (**self).delete_customer(id).await
    }

    async fn list_vacations(&self) -> StoreResult<Vec<Vacation>> {
        (**self).list_vacations().await
    }

    async fn find_vacation(&self, id: VacationId) -> StoreResult<Option<Vacation>> {
        (**self).find_vacation(id).await
    }

    async fn save_vacation(&self, vacation: Vacation) -> StoreResult<Vacation> {
        (**self).save_vacation(vacation).await
    }

    async fn delete_vacation(&self, id: VacationId) -> StoreResult<()> {
        (**self).delete_vacation(id).await
    }

    async fn list_excursions(&self) -> StoreResult<Vec<Excursion>> {
        (**self).list_excursions().await
    }

    async fn find_excursion(&self, id: ExcursionId) -> StoreResult<Option<Excursion>> {
        (**self).find_excursion(id).await
    }

    async fn save_excursion(&self, excursion: Excursion) -> StoreResult<Excursion> {
        (**self).save_excursion(excursion).await
    }

    async fn delete_excursion(&self, id: ExcursionId) -> StoreResult<()> {
        (**self).delete_excursion(id).await
    }

    async fn excursions_for_vacation(&self, id: VacationId) -> StoreResult<Vec<Excursion>> {
        (**self).excursions_for_vacation(id).await
    }
}


