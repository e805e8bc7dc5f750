//! Catalog domain module (countries, divisions, customers, vacations, excursions).
//!
//! This crate contains the reference and catalog records sold through checkout,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage),
//! plus the [`CatalogStore`] contract that storage backends implement.

pub mod country;
pub mod customer;
pub mod store;
pub mod vacation;

pub use country::{Country, Division};
pub use customer::Customer;
pub use store::{CatalogStore, StoreError, StoreResult};
pub use vacation::{Excursion, Vacation};


