//! Persistence contract for placed orders.

use std::sync::Arc;

use wayfarer_catalog::{Customer, StoreResult};
use wayfarer_core::ExpectedVersion;

use crate::order::Order;
use crate::tracking::TrackingNumber;

/// The customer write to commit together with an order.
#[derive(Debug, Clone)]
pub enum CustomerWrite {
    /// Register a new customer record.
    Create(Customer),
    /// Update an existing customer under an optimistic concurrency check.
    Update(Customer, ExpectedVersion),
}

/// Durable storage for the order aggregate.
///
/// Implementations must:
/// - commit `save_order` atomically: the customer write and the order write
///   either both land or neither does
/// - reject duplicate tracking numbers with a conflict
/// - run the customer's optimistic concurrency check inside the same
///   transaction as the order write
#[async_trait::async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist an order together with its customer write.
    async fn save_order(&self, order: Order, customer: CustomerWrite) -> StoreResult<Order>;

    /// Look up a placed order by its tracking number.
    async fn find_order_by_tracking_number(
        &self,
        tracking_number: &TrackingNumber,
    ) -> StoreResult<Option<Order>>;
}

#[async_trait::async_trait]
impl<R> OrderRepository for Arc<R>
where
    R: OrderRepository + ?Sized,
{
    async fn save_order(&self, order: Order, customer: CustomerWrite) -> StoreResult<Order> {
        (**self).save_order(order, customer).await
    }

    async fn find_order_by_tracking_number(
        &self,
        tracking_number: &TrackingNumber,
    ) -> StoreResult<Option<Order>> {
        (**self).find_order_by_tracking_number(tracking_number).await
    }
}


