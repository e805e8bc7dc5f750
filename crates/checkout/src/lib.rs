//! Checkout domain module (order placement).
//!
//! This crate turns a submitted purchase into a durable order: it validates
//! the payload, resolves the customer, prices the cart from the persisted
//! catalog, and commits the order atomically together with the customer write.
//! Notification dispatch is deliberately not part of this crate; it happens
//! after placement has committed.

pub mod order;
pub mod purchase;
pub mod repository;
pub mod service;
pub mod tracking;

pub use order::{Cart, CartItem, Order};
pub use purchase::{
    ExcursionRef, Purchase, PurchaseCart, PurchaseCustomer, PurchaseItem, PurchaseResponse,
    VacationRef,
};
pub use repository::{CustomerWrite, OrderRepository};
pub use service::{OrderPlacementService, PlacedOrder, PlacementError};
pub use tracking::TrackingNumber;


