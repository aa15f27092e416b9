//! Request locale handling
//!
//! The locale middleware resolves `Accept-Language` once per request and
//! runs the rest of the request inside [`with_locale`]. Error messages read
//! it back through [`get_locale`] when they are rendered. Code running
//! outside a request scope (startup, unit tests) falls back to a
//! thread-local set by [`set_locale`].

use std::cell::RefCell;
use std::future::Future;

thread_local! {
    static CURRENT_LOCALE: RefCell<String> = RefCell::new(DEFAULT_LOCALE.to_string());
}

tokio::task_local! {
    static REQUEST_LOCALE: String;
}

pub const SUPPORTED_LOCALES: &[&str] = &["zh", "en"];
pub const DEFAULT_LOCALE: &str = "zh";

/// Set the current locale for the current thread
pub fn set_locale(locale: &str) {
    let locale = normalize_locale(locale);
    CURRENT_LOCALE.with(|l| {
        *l.borrow_mut() = locale.to_string();
    });
}

/// Get the locale of the current request, or of the current thread outside a request
pub fn get_locale() -> String {
    REQUEST_LOCALE
        .try_with(|l| l.clone())
        .unwrap_or_else(|_| CURRENT_LOCALE.with(|l| l.borrow().clone()))
}

/// Run `fut` with `locale` as the request locale.
///
/// Task-local, so it follows the request across worker threads.
pub async fn with_locale<F>(locale: &str, fut: F) -> F::Output
where
    F: Future,
{
    REQUEST_LOCALE.scope(normalize_locale(locale).to_string(), fut).await
}

/// Map a single language tag ("zh-CN", "en_US", "EN") to a supported locale
fn normalize_locale(tag: &str) -> &'static str {
    let primary = tag
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    SUPPORTED_LOCALES
        .iter()
        .find(|supported| **supported == primary)
        .copied()
        .unwrap_or(DEFAULT_LOCALE)
}

/// Pick the best supported locale from an Accept-Language header value.
///
/// Entries are ranked by their `q` weight; ties keep header order. Entries
/// for unsupported languages are skipped rather than mapped to the default,
/// so `fr, en;q=0.5` resolves to `en`.
pub fn extract_locale_from_header(header_value: Option<&str>) -> String {
    let Some(value) = header_value else {
        return DEFAULT_LOCALE.to_string();
    };

    let mut best: Option<(&'static str, f32)> = None;
    for entry in value.split(',') {
        let mut parts = entry.split(';');
        let tag = parts.next().unwrap_or_default().trim();
        if tag.is_empty() || tag == "*" {
            continue;
        }

        let weight = parts
            .filter_map(|p| p.trim().strip_prefix("q="))
            .find_map(|q| q.parse::<f32>().ok())
            .unwrap_or(1.0);

        let primary = tag.split(['-', '_']).next().unwrap_or_default().to_ascii_lowercase();
        if !SUPPORTED_LOCALES.contains(&primary.as_str()) || weight <= 0.0 {
            continue;
        }

        if best.is_none_or(|(_, w)| weight > w) {
            best = Some((normalize_locale(tag), weight));
        }
    }

    best.map(|(locale, _)| locale).unwrap_or(DEFAULT_LOCALE).to_string()
}
