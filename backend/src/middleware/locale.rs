//! Locale extraction middleware
//!
//! Resolves the request locale from `Accept-Language` before the handler runs.

use axum::{extract::Request, http::header::ACCEPT_LANGUAGE, middleware::Next, response::Response};

use crate::utils::{extract_locale_from_header, with_locale};

/// Middleware to extract locale from Accept-Language header
pub async fn locale_middleware(req: Request, next: Next) -> Response {
    let header = req.headers().get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok());
    let locale = extract_locale_from_header(header);
    tracing::trace!("Request locale: {}", locale);

    with_locale(&locale, next.run(req)).await
}
