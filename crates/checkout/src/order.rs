use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use wayfarer_core::{CustomerId, DomainError, DomainResult, ExcursionId, OrderId, VacationId};

use crate::tracking::TrackingNumber;

/// One purchased line: a vacation plus any excursions booked with it.
///
/// The line price is captured from the catalog at placement time; later
/// catalog edits do not change an already placed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItem {
    pub vacation_id: VacationId,
    pub excursion_ids: Vec<ExcursionId>,
    /// Vacation base price plus the sum of excursion prices.
    pub price: Decimal,
}

impl CartItem {
    /// Build a line item priced from catalog values.
    pub fn priced(
        vacation_id: VacationId,
        excursion_ids: Vec<ExcursionId>,
        vacation_price: Decimal,
        excursion_prices: &[Decimal],
    ) -> Self {
        let price = excursion_prices
            .iter()
            .fold(vacation_price, |total, p| total + p);
        Self {
            vacation_id,
            excursion_ids,
            price,
        }
    }
}

/// The set of line items captured by one checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    pub items: Vec<CartItem>,
    /// Sum of all line prices. Always derived from `items`, never from
    /// client input.
    pub package_price: Decimal,
}

impl Cart {
    pub fn from_items(items: Vec<CartItem>) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::validation("cart must contain at least one item"));
        }

        let package_price = items.iter().map(|item| item.price).sum();
        Ok(Self {
            items,
            package_price,
        })
    }
}

/// A placed order.
///
/// Created solely by order placement and immutable afterwards. The tracking
/// number is assigned exactly once, at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub tracking_number: TrackingNumber,
    pub customer_id: CustomerId,
    pub cart: Cart,
    /// Authoritative total, equal to the cart's package price at placement.
    pub total_price: Decimal,
    pub placed_at: DateTime<Utc>,
}

impl Order {
    /// Assemble a new order for a resolved customer and priced cart.
    pub fn place(customer_id: CustomerId, cart: Cart) -> Self {
        let total_price = cart.package_price;
        Self {
            id: OrderId::new(),
            tracking_number: TrackingNumber::generate(),
            customer_id,
            cart,
            total_price,
            placed_at: Utc::now(),
        }
    }
}
