//! Checkout wire types.
//!
//! Field names follow the storefront payload: camelCase for customer name
//! fields and the response, snake_case for address and cart fields. Only
//! identifiers are trusted from the client; submitted prices are advisory
//! and never flow into the persisted total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use wayfarer_catalog::Division;
use wayfarer_core::{CustomerId, DivisionId, DomainResult, ExcursionId, VacationId};

use crate::tracking::TrackingNumber;

/// A submitted purchase: customer details plus the cart being checked out.
///
/// Transient input; mapped into persisted records, never stored as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub customer: PurchaseCustomer,
    pub cart: PurchaseCart,
    #[serde(rename = "cartItems", default)]
    pub cart_items: Vec<PurchaseItem>,
}

/// Customer details attached to a purchase.
///
/// With `id` present the existing customer is reused and its contact fields
/// updated under an optimistic concurrency check; without `id` a new customer
/// record is registered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseCustomer {
    #[serde(default)]
    pub id: Option<CustomerId>,
    /// Expected customer version for the concurrency check. When absent, the
    /// version read during resolution is used.
    #[serde(default)]
    pub version: Option<u64>,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub address: String,
    pub postal_code: String,
    pub phone: String,
    /// Division reference: a bare identifier or a resource URL. Required when
    /// registering a new customer; optional when reusing an existing one.
    #[serde(default)]
    pub division: Option<String>,
}

impl PurchaseCustomer {
    /// Parse the division reference, if one was submitted.
    pub fn division_id(&self) -> DomainResult<Option<DivisionId>> {
        match &self.division {
            Some(reference) => Division::parse_ref(reference).map(Some),
            None => Ok(None),
        }
    }
}

/// Cart summary as submitted by the client.
///
/// `package_price` is whatever the storefront displayed; the server recomputes
/// the total from catalog prices and ignores this value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseCart {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub package_price: Option<Decimal>,
    #[serde(default)]
    pub party_size: Option<u32>,
}

/// One cart line: a vacation reference plus selected excursion references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseItem {
    pub vacation: VacationRef,
    #[serde(default)]
    pub excursions: Vec<ExcursionRef>,
}

/// Reference to a catalog vacation by identifier. Any other fields the client
/// sends alongside are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationRef {
    pub id: VacationId,
}

/// Reference to a catalog excursion by identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcursionRef {
    pub id: ExcursionId,
}

/// Checkout response returned to the storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseResponse {
    #[serde(rename = "orderTrackingNumber")]
    pub order_tracking_number: TrackingNumber,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    #[serde(rename = "totalPrice", with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_the_storefront_payload() {
        let vacation_id = VacationId::new();
        let excursion_id = ExcursionId::new();
        let payload = json!({
            "customer": {
                "firstName": "John",
                "lastName": "Doe",
                "address": "123 Main St",
                "postal_code": "12345",
                "phone": "(123)456-7890"
            },
            "cart": {
                "package_price": 1695.00,
                "party_size": 2,
                "status": "ordered"
            },
            "cartItems": [
                {
                    "vacation": {
                        "id": vacation_id,
                        "vacation_title": "Beach Paradise",
                        "travel_price": 1.00
                    },
                    "excursions": [
                        { "id": excursion_id, "excursion_price": 1.00 }
                    ]
                }
            ]
        });

        let purchase: Purchase = serde_json::from_value(payload).unwrap();

        assert_eq!(purchase.customer.id, None);
        assert_eq!(purchase.customer.first_name, "John");
        assert_eq!(purchase.customer.division, None);
        assert_eq!(
            purchase.cart.package_price,
            Some("1695.00".parse().unwrap())
        );
        assert_eq!(purchase.cart_items.len(), 1);
        assert_eq!(purchase.cart_items[0].vacation.id, vacation_id);
        assert_eq!(purchase.cart_items[0].excursions[0].id, excursion_id);
    }

    #[test]
    fn missing_cart_items_defaults_to_empty() {
        let payload = json!({
            "customer": {
                "firstName": "John",
                "lastName": "Doe",
                "address": "",
                "postal_code": "",
                "phone": ""
            },
            "cart": {}
        });

        let purchase: Purchase = serde_json::from_value(payload).unwrap();
        assert!(purchase.cart_items.is_empty());
        assert_eq!(purchase.cart.package_price, None);
    }

    #[test]
    fn division_id_parses_bare_and_url_references() {
        let division_id = DivisionId::new();
        let mut customer = PurchaseCustomer {
            id: None,
            version: None,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            address: String::new(),
            postal_code: String::new(),
            phone: String::new(),
            division: Some(division_id.to_string()),
        };
        assert_eq!(customer.division_id().unwrap(), Some(division_id));

        customer.division = Some(format!("/api/divisions/{division_id}"));
        assert_eq!(customer.division_id().unwrap(), Some(division_id));

        customer.division = None;
        assert_eq!(customer.division_id().unwrap(), None);
    }

    #[test]
    fn response_serializes_total_price_as_a_number() {
        let response = PurchaseResponse {
            order_tracking_number: TrackingNumber::from("track-1".to_string()),
            customer_name: "John Doe".to_string(),
            total_price: "195.00".parse().unwrap(),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["orderTrackingNumber"], "track-1");
        assert_eq!(value["customerName"], "John Doe");
        assert_eq!(value["totalPrice"], json!(195.0));
    }
}


