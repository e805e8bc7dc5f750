use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;

use wayfarer_catalog::{Country, Customer, Division, Excursion, Vacation};
use wayfarer_core::VacationId;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub address: String,
    pub postal_code: String,
    pub phone: String,
    /// Division reference: a bare identifier or `/api/divisions/<id>`.
    #[serde(default)]
    pub division: Option<String>,
    /// Expected version for updates; ignored on create.
    #[serde(default)]
    pub version: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct VacationRequest {
    #[serde(rename = "vacation_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "travel_price")]
    pub price: Decimal,
    #[serde(rename = "image_URL", default)]
    pub image_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ExcursionRequest {
    #[serde(rename = "excursion_title")]
    pub title: String,
    #[serde(rename = "excursion_price")]
    pub price: Decimal,
    #[serde(rename = "image_URL", default)]
    pub image_url: String,
    /// Owning vacation. Required on create; on update, present means re-point.
    #[serde(default)]
    pub vacation: Option<VacationRefBody>,
}

#[derive(Debug, Deserialize)]
pub struct VacationRefBody {
    pub id: VacationId,
}

// -------------------------
// JSON mapping helpers
// -------------------------

/// Collection payload in the `{"_embedded": {"<key>": [...]}}` shape the
/// storefront data services expect.
pub fn embedded(key: &str, items: Vec<serde_json::Value>) -> serde_json::Value {
    let mut inner = serde_json::Map::new();
    inner.insert(key.to_string(), serde_json::Value::Array(items));
    let mut outer = serde_json::Map::new();
    outer.insert("_embedded".to_string(), serde_json::Value::Object(inner));
    serde_json::Value::Object(outer)
}

/// Prices go over the wire as JSON numbers, matching the storefront models.
fn price_json(price: Decimal) -> serde_json::Value {
    price
        .to_f64()
        .and_then(serde_json::Number::from_f64)
        .map(serde_json::Value::Number)
        .unwrap_or_else(|| serde_json::Value::String(price.to_string()))
}

pub fn country_to_json(country: Country) -> serde_json::Value {
    serde_json::json!({
        "id": country.id.to_string(),
        "country_name": country.name,
    })
}

pub fn division_to_json(division: Division) -> serde_json::Value {
    serde_json::json!({
        "id": division.id.to_string(),
        "division_name": division.name,
        "country_id": division.country_id.to_string(),
    })
}

pub fn customer_to_json(customer: Customer) -> serde_json::Value {
    serde_json::json!({
        "id": customer.id.to_string(),
        "firstName": customer.first_name,
        "lastName": customer.last_name,
        "address": customer.address,
        "postal_code": customer.postal_code,
        "phone": customer.phone,
        "division_id": customer.division_id.to_string(),
        "version": customer.version,
    })
}

pub fn vacation_to_json(vacation: Vacation) -> serde_json::Value {
    serde_json::json!({
        "id": vacation.id.to_string(),
        "vacation_title": vacation.title,
        "description": vacation.description,
        "travel_price": price_json(vacation.price),
        "image_URL": vacation.image_url,
    })
}

pub fn excursion_to_json(excursion: Excursion) -> serde_json::Value {
    serde_json::json!({
        "id": excursion.id.to_string(),
        "excursion_title": excursion.title,
        "excursion_price": price_json(excursion.price),
        "image_URL": excursion.image_url,
        "vacation_id": excursion.vacation_id.to_string(),
    })
}
