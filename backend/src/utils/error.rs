use axum::{
    Json,
    extract::{FromRequest, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_i18n::t;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use super::i18n::get_locale;
use crate::models::{MAX_YEAR, MIN_YEAR};

/// API Error returned by the HTTP facade
///
/// Only request problems surface as errors. Upstream completion failures
/// are folded into the blessing text by the service layer and never reach here.
#[derive(Error, Debug)]
pub enum ApiError {
    // Validation errors 4xxx
    #[error("Invalid year: {0}")]
    InvalidYear(String),

    #[error("Year {year} out of range")]
    YearOutOfRange { year: i64 },

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl ApiError {
    /// Helper to create invalid year error
    pub fn invalid_year(raw: impl Into<String>) -> Self {
        Self::InvalidYear(raw.into())
    }

    /// Helper to create out-of-range year error
    pub fn year_out_of_range(year: i64) -> Self {
        Self::YearOutOfRange { year }
    }

    /// Helper to create validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    pub fn error_code(&self) -> i32 {
        match self {
            Self::InvalidYear(_) => 4001,
            Self::YearOutOfRange { .. } => 4002,
            Self::ValidationError(_) => 4003,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Get localized error message based on current locale
    pub fn localized_message(&self) -> String {
        let locale = get_locale();
        match self {
            Self::InvalidYear(_) => t!("validation.invalid_year", locale = &locale).to_string(),
            Self::YearOutOfRange { .. } => t!(
                "validation.year_out_of_range",
                locale = &locale,
                min = MIN_YEAR,
                max = MAX_YEAR
            )
            .to_string(),
            Self::ValidationError(details) => {
                t!("validation.failed", locale = &locale, details = details).to_string()
            },
        }
    }
}

/// Malformed, mistyped or non-JSON bodies
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation_error(rejection.body_text())
    }
}

/// `Json` extractor whose rejections render as [`ApiErrorResponse`]
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Error body: `{"error": "...", "code": 4002}`
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    pub error: String,
    pub code: i32,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::debug!("Rejected request: {}", self);

        let response = ApiErrorResponse { error: self.localized_message(), code: self.error_code() };

        (status, Json(response)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
