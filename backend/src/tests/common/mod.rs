// Common test utilities and helpers

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

use crate::services::{CompletionClient, LLMError};
use crate::{AppState, build_router};

/// Completion client double: replies from a script and records prompts
pub struct MockCompletionClient {
    reply: Box<dyn Fn() -> Result<String, LLMError> + Send + Sync>,
    pub prompts: Mutex<Vec<String>>,
}

impl MockCompletionClient {
    pub fn replying(text: &'static str) -> Arc<Self> {
        Self::with(move || Ok(text.to_string()))
    }

    pub fn failing(make_err: fn() -> LLMError) -> Arc<Self> {
        Self::with(move || Err(make_err()))
    }

    fn with(reply: impl Fn() -> Result<String, LLMError> + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self { reply: Box::new(reply), prompts: Mutex::new(Vec::new()) })
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String, LLMError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.reply)()
    }
}

pub fn test_app(client: Arc<MockCompletionClient>) -> Router {
    build_router(Arc::new(AppState::new(client)))
}

/// Send a request and decode the JSON response body
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("read body");
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub fn post_generate(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/generate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// POST /generate with an arbitrary body and optional Content-Type
pub fn post_generate_raw(body: &str, content_type: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri("/generate");
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
