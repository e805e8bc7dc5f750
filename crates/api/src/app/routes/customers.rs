use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use wayfarer_catalog::{Customer, Division};
use wayfarer_core::{CustomerId, ExpectedVersion};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/:id/division", get(get_customer_division))
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let customers = match services.list_customers().await {
        Ok(customers) => customers,
        Err(e) => return errors::store_error_to_response(e),
    };
    let items = customers
        .into_iter()
        .map(dto::customer_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(dto::embedded("customers", items))).into_response()
}

pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CustomerId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid customer id",
            );
        }
    };

    match services.find_customer(id).await {
        Ok(Some(customer)) => {
            (StatusCode::OK, Json(dto::customer_to_json(customer))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "customer not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CustomerRequest>,
) -> axum::response::Response {
    let Some(reference) = body.division.as_deref() else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "customer division is required",
        );
    };
    let division_id = match Division::parse_ref(reference) {
        Ok(id) => id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let customer = match Customer::new(
        CustomerId::new(),
        body.first_name,
        body.last_name,
        body.address,
        body.postal_code,
        body.phone,
        division_id,
    ) {
        Ok(customer) => customer,
        Err(e) => return errors::domain_error_to_response(e),
    };

    // The store validates the division reference and rejects unknown ones.
    match services.save_customer(customer, ExpectedVersion::Exact(0)).await {
        Ok(saved) => (StatusCode::OK, Json(dto::customer_to_json(saved))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::CustomerRequest>,
) -> axum::response::Response {
    let id: CustomerId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid customer id",
            );
        }
    };

    let mut customer = match services.find_customer(id).await {
        Ok(Some(customer)) => customer,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "customer not found");
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    // Absent division keeps the stored one.
    let division_id = match body.division.as_deref() {
        Some(reference) => match Division::parse_ref(reference) {
            Ok(division_id) => division_id,
            Err(e) => return errors::domain_error_to_response(e),
        },
        None => customer.division_id,
    };

    let expected = ExpectedVersion::Exact(body.version.unwrap_or(customer.version));
    if let Err(e) = customer.update_details(
        body.first_name,
        body.last_name,
        body.address,
        body.postal_code,
        body.phone,
        division_id,
    ) {
        return errors::domain_error_to_response(e);
    }

    match services.save_customer(customer, expected).await {
        Ok(saved) => (StatusCode::OK, Json(dto::customer_to_json(saved))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CustomerId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid customer id",
            );
        }
    };

    match services.delete_customer(id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// The division a customer belongs to, for the storefront's address forms.
pub async fn get_customer_division(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CustomerId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid customer id",
            );
        }
    };

    let customer = match services.find_customer(id).await {
        Ok(Some(customer)) => customer,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "customer not found");
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    match services.find_division(customer.division_id).await {
        Ok(Some(division)) => {
            (StatusCode::OK, Json(dto::division_to_json(division))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "division not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}


