use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use wayfarer_core::CountryId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_countries))
        .route("/:id", get(get_country))
}

pub async fn list_countries(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let countries = match services.list_countries().await {
        Ok(countries) => countries,
        Err(e) => return errors::store_error_to_response(e),
    };
    let items = countries
        .into_iter()
        .map(dto::country_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(dto::embedded("countries", items))).into_response()
}

pub async fn get_country(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: CountryId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid country id");
        }
    };

    match services.find_country(id).await {
        Ok(Some(country)) => (StatusCode::OK, Json(dto::country_to_json(country))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "country not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}


