pub mod error;
pub mod i18n;

pub use error::{ApiError, ApiErrorResponse, ApiJson, ApiResult};
pub use i18n::{extract_locale_from_header, get_locale, set_locale, with_locale};
