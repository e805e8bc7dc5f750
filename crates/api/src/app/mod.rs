//! HTTP API application wiring (Axum router + service wiring).
//!
//! If you're new to Rust, this folder is structured like:
//! - `services.rs`: infrastructure wiring (stores, checkout service, notifications)
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses
//! - `spa.rs`: static front-end fallback

use std::path::PathBuf;
use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Extension, Router};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;
pub mod spa;

/// Runtime configuration for the HTTP layer, read from the environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Browser origin allowed by CORS (the storefront dev server by default).
    pub frontend_origin: String,
    /// Directory holding the built storefront bundle.
    pub static_dir: PathBuf,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            frontend_origin: std::env::var("FRONTEND_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:4200".to_string()),
            static_dir: std::env::var("STATIC_DIR")
                .unwrap_or_else(|_| "static".to_string())
                .into(),
        }
    }
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app() -> Router {
    let services = Arc::new(services::build_services().await);
    app_with(services, ApiConfig::from_env())
}

/// Assemble the router from prebuilt services; used by `build_app` and tests.
pub fn app_with(services: Arc<services::AppServices>, config: ApiConfig) -> Router {
    let allowed_origin = HeaderValue::from_str(&config.frontend_origin)
        .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:4200"));
    let cors = middleware::CorsState { allowed_origin };

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .fallback(spa::fallback)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    cors,
                    middleware::cors_middleware,
                ))
                .layer(Extension(services))
                .layer(Extension(Arc::new(config))),
        )
}
