use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use wayfarer_checkout::Purchase;
use wayfarer_notify::BookingNotification;

use crate::app::errors;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/purchase", post(place_order))
}

/// Checkout entrypoint: price the cart, commit the order and the customer
/// write, then offer the booking notification. The response reflects the
/// committed order whatever the notification outcome.
pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    Json(purchase): Json<Purchase>,
) -> axum::response::Response {
    let placed = match services.place_order(purchase).await {
        Ok(placed) => placed,
        Err(e) => return errors::placement_error_to_response(e),
    };

    tracing::info!(
        "order {} placed for {}",
        placed.order.tracking_number,
        placed.customer.full_name()
    );

    // Dispatch strictly after the commit; failures are logged and swallowed.
    let notification = BookingNotification::new(
        placed.order.tracking_number.as_str(),
        placed.customer.full_name(),
        placed.vacation_title.clone(),
        placed.order.total_price,
    );
    services.notifications().dispatch(&notification);

    (StatusCode::OK, Json(placed.response())).into_response()
}


