use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use wayfarer_core::DivisionId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_divisions))
        .route("/:id", get(get_division))
}

pub async fn list_divisions(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let divisions = match services.list_divisions().await {
        Ok(divisions) => divisions,
        Err(e) => return errors::store_error_to_response(e),
    };
    let items = divisions
        .into_iter()
        .map(dto::division_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(dto::embedded("divisions", items))).into_response()
}

pub async fn get_division(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: DivisionId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid division id",
            );
        }
    };

    match services.find_division(id).await {
        Ok(Some(division)) => {
            (StatusCode::OK, Json(dto::division_to_json(division))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "division not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}


