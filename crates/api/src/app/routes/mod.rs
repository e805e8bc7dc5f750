use axum::Router;

pub mod checkout;
pub mod countries;
pub mod customers;
pub mod divisions;
pub mod excursions;
pub mod system;
pub mod vacations;

/// Router for everything under `/api`.
pub fn router() -> Router {
    Router::new()
        .nest("/api/checkout", checkout::router())
        .nest("/api/countries", countries::router())
        .nest("/api/divisions", divisions::router())
        .nest("/api/customers", customers::router())
        .nest("/api/vacations", vacations::router())
        .nest("/api/excursions", excursions::router())
}


