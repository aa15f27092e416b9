//! Spring Festival blessing service
//!
//! Generates 春节 greetings through a chat-completion endpoint, decorating
//! the prompt with the year's zodiac and sexagenary name.

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

rust_i18n::i18n!("locales", fallback = "zh");

pub use config::Config;
pub use services::{BlessingService, CompletionClient, LLMClient};

/// Shared, read-only state for all handlers
pub struct AppState {
    pub blessing_service: BlessingService,
}

impl AppState {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { blessing_service: BlessingService::new(client) }
    }

    /// Build state backed by the real completion endpoint
    pub fn from_config(config: &Config) -> Result<Self, anyhow::Error> {
        let client = LLMClient::new(config.llm.clone())?;
        Ok(Self::new(Arc::new(client)))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handlers::blessing::generate, handlers::health::health),
    components(schemas(
        models::GenerateRequest,
        models::GenerateResponse,
        models::HealthResponse,
        utils::ApiErrorResponse,
    )),
    tags(
        (name = "Blessing", description = "Blessing generation"),
        (name = "System", description = "Service status"),
    )
)]
pub struct ApiDoc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::assets::index))
        .route("/static/*path", get(handlers::assets::static_asset))
        .route("/generate", post(handlers::blessing::generate))
        .route("/health", get(handlers::health::health))
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum_middleware::from_fn(middleware::locale_middleware))
        .layer(TraceLayer::new_for_http())
}
