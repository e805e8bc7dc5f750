use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use wayfarer_catalog::Excursion;
use wayfarer_core::ExcursionId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_excursions).post(create_excursion))
        .route(
            "/:id",
            get(get_excursion)
                .put(update_excursion)
                .delete(delete_excursion),
        )
}

pub async fn list_excursions(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let excursions = match services.list_excursions().await {
        Ok(excursions) => excursions,
        Err(e) => return errors::store_error_to_response(e),
    };
    let items = excursions
        .into_iter()
        .map(dto::excursion_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(dto::embedded("excursions", items))).into_response()
}

pub async fn get_excursion(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ExcursionId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid excursion id",
            );
        }
    };

    match services.find_excursion(id).await {
        Ok(Some(excursion)) => {
            (StatusCode::OK, Json(dto::excursion_to_json(excursion))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "excursion not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_excursion(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ExcursionRequest>,
) -> axum::response::Response {
    let Some(vacation) = body.vacation else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "excursion vacation is required",
        );
    };

    let excursion = match Excursion::new(
        ExcursionId::new(),
        vacation.id,
        body.title,
        body.price,
        body.image_url,
    ) {
        Ok(excursion) => excursion,
        Err(e) => return errors::domain_error_to_response(e),
    };

    // The store validates the vacation reference and rejects unknown ones.
    match services.save_excursion(excursion).await {
        Ok(saved) => (StatusCode::OK, Json(dto::excursion_to_json(saved))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_excursion(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::ExcursionRequest>,
) -> axum::response::Response {
    let id: ExcursionId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid excursion id",
            );
        }
    };

    let mut excursion = match services.find_excursion(id).await {
        Ok(Some(excursion)) => excursion,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "excursion not found");
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Err(e) = excursion.update(body.title, body.price, body.image_url) {
        return errors::domain_error_to_response(e);
    }
    // Present vacation re-points the excursion; absent keeps the stored one.
    if let Some(vacation) = body.vacation {
        excursion.vacation_id = vacation.id;
    }

    match services.save_excursion(excursion).await {
        Ok(saved) => (StatusCode::OK, Json(dto::excursion_to_json(saved))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_excursion(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ExcursionId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid excursion id",
            );
        }
    };

    match services.delete_excursion(id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}


