//! Storage backends for catalog records and placed orders.
//!
//! Both backends implement [`wayfarer_catalog::CatalogStore`] and
//! [`wayfarer_checkout::OrderRepository`], so the application wires either one
//! without touching the placement pipeline.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;


