//! Storefront fallback: serves the built single-page bundle.
//!
//! Anything outside `/api` falls through to here. Asset paths (a dot in the
//! last segment) are read from the static directory; every other path gets
//! `index.html` so the storefront router can resolve it client-side.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::extract::Extension;
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};

use crate::app::ApiConfig;
use crate::app::errors;

pub async fn fallback(
    Extension(config): Extension<Arc<ApiConfig>>,
    method: Method,
    uri: Uri,
) -> Response {
    if method != Method::GET {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "no such route");
    }

    let path = uri.path();
    if path.starts_with("/api") {
        return errors::json_error(StatusCode::NOT_FOUND, "not_found", "no such route");
    }

    let trimmed = path.trim_start_matches('/');
    let is_asset = trimmed
        .rsplit('/')
        .next()
        .is_some_and(|segment| segment.contains('.'));

    let file = if is_asset {
        match sanitize(trimmed) {
            Some(relative) => config.static_dir.join(relative),
            None => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "no such asset"),
        }
    } else {
        // Storefront routes resolve client-side; hand back the shell.
        config.static_dir.join("index.html")
    };

    serve_file(&file).await
}

/// Reject any path component that could escape the static directory.
fn sanitize(relative: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            _ => return None,
        }
    }
    if clean.as_os_str().is_empty() {
        return None;
    }
    Some(clean)
}

async fn serve_file(file: &Path) -> Response {
    match tokio::fs::read(file).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type_for(file))], bytes).into_response(),
        Err(_) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "no such asset"),
    }
}

fn content_type_for(file: &Path) -> &'static str {
    match file.extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "application/javascript",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_rejects_parent_components() {
        assert!(sanitize("../etc/passwd").is_none());
        assert!(sanitize("assets/../../etc/passwd").is_none());
        assert_eq!(
            sanitize("assets/logo.png"),
            Some(PathBuf::from("assets/logo.png"))
        );
    }

    #[test]
    fn content_types_cover_the_bundle() {
        assert_eq!(
            content_type_for(Path::new("index.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(content_type_for(Path::new("main.js")), "application/javascript");
        assert_eq!(content_type_for(Path::new("odd.bin")), "application/octet-stream");
    }
}


