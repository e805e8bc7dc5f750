use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Allowed browser origin for cross-origin requests (the storefront).
#[derive(Clone)]
pub struct CorsState {
    pub allowed_origin: HeaderValue,
}

/// Single-origin CORS: answers preflights and stamps response headers when
/// the request `Origin` matches the configured storefront origin. Requests
/// from other origins pass through untouched and the browser blocks them.
pub async fn cors_middleware(
    State(state): State<CorsState>,
    req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let origin_allowed = req
        .headers()
        .get(header::ORIGIN)
        .is_some_and(|origin| origin == &state.allowed_origin);

    if req.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        if origin_allowed {
            apply_cors_headers(response.headers_mut(), &state.allowed_origin);
        }
        return response;
    }

    let mut response = next.run(req).await;
    if origin_allowed {
        apply_cors_headers(response.headers_mut(), &state.allowed_origin);
    }
    response
}

fn apply_cors_headers(headers: &mut HeaderMap, origin: &HeaderValue) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));
}


