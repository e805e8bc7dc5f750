use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use wayfarer_catalog::Vacation;
use wayfarer_core::VacationId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_vacations).post(create_vacation))
        .route(
            "/:id",
            get(get_vacation).put(update_vacation).delete(delete_vacation),
        )
        .route("/:id/excursions", get(get_vacation_excursions))
}

pub async fn list_vacations(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let vacations = match services.list_vacations().await {
        Ok(vacations) => vacations,
        Err(e) => return errors::store_error_to_response(e),
    };
    let items = vacations
        .into_iter()
        .map(dto::vacation_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(dto::embedded("vacations", items))).into_response()
}

pub async fn get_vacation(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: VacationId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid vacation id",
            );
        }
    };

    match services.find_vacation(id).await {
        Ok(Some(vacation)) => {
            (StatusCode::OK, Json(dto::vacation_to_json(vacation))).into_response()
        }
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "vacation not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn create_vacation(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::VacationRequest>,
) -> axum::response::Response {
    let vacation = match Vacation::new(
        VacationId::new(),
        body.title,
        body.description,
        body.price,
        body.image_url,
    ) {
        Ok(vacation) => vacation,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.save_vacation(vacation).await {
        Ok(saved) => (StatusCode::OK, Json(dto::vacation_to_json(saved))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_vacation(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::VacationRequest>,
) -> axum::response::Response {
    let id: VacationId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid vacation id",
            );
        }
    };

    let mut vacation = match services.find_vacation(id).await {
        Ok(Some(vacation)) => vacation,
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "vacation not found");
        }
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Err(e) = vacation.update(body.title, body.description, body.price, body.image_url) {
        return errors::domain_error_to_response(e);
    }

    match services.save_vacation(vacation).await {
        Ok(saved) => (StatusCode::OK, Json(dto::vacation_to_json(saved))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Deleting a vacation also deletes its excursions.
pub async fn delete_vacation(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: VacationId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid vacation id",
            );
        }
    };

    match services.delete_vacation(id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_vacation_excursions(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: VacationId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_id",
                "invalid vacation id",
            );
        }
    };

    match services.find_vacation(id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "vacation not found");
        }
        Err(e) => return errors::store_error_to_response(e),
    }

    let excursions = match services.excursions_for_vacation(id).await {
        Ok(excursions) => excursions,
        Err(e) => return errors::store_error_to_response(e),
    };
    let items = excursions
        .into_iter()
        .map(dto::excursion_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(dto::embedded("excursions", items))).into_response()
}


