use std::sync::Arc;

use axum::{Json, extract::State};
use tracing::Instrument;

use crate::AppState;
use crate::models::{GenerateRequest, GenerateResponse};
use crate::utils::{ApiJson, ApiResult};

/// Generate a Spring Festival blessing
///
/// Upstream failures do not change the status code; the failure description
/// is returned in `blessing` instead.
#[utoipa::path(
    post,
    path = "/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated blessing", body = GenerateResponse),
        (status = 400, description = "Malformed body, invalid or out-of-range year", body = crate::utils::ApiErrorResponse),
    ),
    tag = "Blessing"
)]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<GenerateRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    let request = payload.into_generation_request()?;

    let span = tracing::info_span!(
        "generate",
        request_id = %uuid::Uuid::new_v4(),
        year = request.year,
        category = %request.category,
        style = %request.style,
    );

    async move {
        tracing::info!("Generating blessing (keyword: {:?})", request.keyword);
        let started = std::time::Instant::now();
        let result = state.blessing_service.generate(&request).await;
        tracing::info!(
            "Blessing ready in {}ms ({} chars)",
            started.elapsed().as_millis(),
            result.blessing_text.chars().count()
        );
        Ok(Json(GenerateResponse::from(result)))
    }
    .instrument(span)
    .await
}
