//! Locale preference cookie.
//!
//! The cookie must stay readable from client scripts, so it is never
//! marked `HttpOnly`.

use crate::i18n::Locale;
use axum::http::{HeaderMap, HeaderValue};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

/// Lifetime of the preference cookie in seconds (2 hours).
pub const LOCALE_COOKIE_MAX_AGE_SECS: i64 = 2 * 60 * 60;

#[derive(Debug, Clone)]
pub struct LocaleCookie {
    name: String,
}

impl LocaleCookie {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Raw cookie value, if the request carries one. Not validated.
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        CookieJar::from_headers(headers)
            .get(&self.name)
            .map(|cookie| cookie.value().to_string())
    }

    /// The `Set-Cookie` cookie persisting `locale`.
    pub fn build(&self, locale: Locale) -> Cookie<'static> {
        Cookie::build((self.name.clone(), locale.code()))
            .path("/")
            .max_age(time::Duration::seconds(LOCALE_COOKIE_MAX_AGE_SECS))
            .same_site(SameSite::Lax)
            .http_only(false)
            .build()
    }

    /// Header value for a `Set-Cookie` response header.
    pub fn header_value(&self, locale: Locale) -> Option<HeaderValue> {
        HeaderValue::from_str(&self.build(locale).to_string()).ok()
    }
}
