//! Health, landing page and API docs

use axum::http::StatusCode;
use serde_json::json;

use super::common::*;
use crate::config::LlmConfig;
use crate::services::LLMClient;
use crate::{AppState, build_router};
use std::sync::Arc;

#[tokio::test]
async fn test_health_ok() {
    let (status, body) = send(test_app(MockCompletionClient::replying("")), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_health_ok_without_llm_configuration() {
    let client = LLMClient::new(LlmConfig::default()).unwrap();
    let app = build_router(Arc::new(AppState::new(Arc::new(client))));

    let (status, body) = send(app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_generate_without_llm_configuration_reports_in_blessing() {
    let client = LLMClient::new(LlmConfig::default()).unwrap();
    let app = build_router(Arc::new(AppState::new(Arc::new(client))));

    let (status, body) = send(app, post_generate(json!({"year": 2025}))).await;
    assert_eq!(status, StatusCode::OK);
    let blessing = body["blessing"].as_str().unwrap();
    assert!(blessing.starts_with("生成祝福语时出错: "));
    assert!(blessing.contains("API_URL"));
}

#[tokio::test]
async fn test_index_served() {
    use tower::ServiceExt;

    let app = test_app(MockCompletionClient::replying(""));
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
}

#[tokio::test]
async fn test_unknown_static_asset_404() {
    let (status, _) = send(test_app(MockCompletionClient::replying("")), get("/static/nope.js")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document() {
    let (status, body) =
        send(test_app(MockCompletionClient::replying("")), get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/generate"]["post"].is_object());
    assert!(body["paths"]["/health"]["get"].is_object());
}
