//! Embedded landing page and its static assets

use axum::{
    extract::Path,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "static/"]
struct StaticAssets;

/// GET /
pub async fn index() -> Response {
    serve_asset("index.html")
}

/// GET /static/*path
pub async fn static_asset(Path(path): Path<String>) -> Response {
    serve_asset(path.trim_start_matches('/'))
}

fn serve_asset(path: &str) -> Response {
    match StaticAssets::get(path) {
        Some(file) => ([(header::CONTENT_TYPE, content_type_for(path))], file.data).into_response(),
        None => {
            tracing::debug!("Static asset not found: {}", path);
            StatusCode::NOT_FOUND.into_response()
        },
    }
}

fn content_type_for(path: &str) -> &'static str {
    match path.rsplit('.').next().unwrap_or_default() {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "json" => "application/json",
        "png" => "image/png",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}
