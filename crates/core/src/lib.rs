//! `wayfarer-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod version;

pub use error::{DomainError, DomainResult};
pub use id::{CountryId, CustomerId, DivisionId, ExcursionId, OrderId, VacationId};
pub use version::ExpectedVersion;


