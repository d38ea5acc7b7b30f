//! Request locale resolution.
//!
//! Every page path carries its locale as the first segment. The decision is
//! a pure function of (path, cookie value, registry) so it can be tested
//! without a server; [`resolve_locale`] only applies it to axum requests.

use crate::cookie::LocaleCookie;
use crate::i18n::Locale;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::SET_COOKIE, request::Parts, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{debug, warn};

/// Paths that bypass locale handling entirely.
pub const EXEMPT_PREFIXES: [&str; 5] = ["/api", "/_next", "/assets", "/favicon.ico", "/.well-known"];

/// Request header carrying the resolved locale code.
pub const LOCALE_HEADER: HeaderName = HeaderName::from_static("x-locale");

/// Request header carrying the original request path.
pub const PATHNAME_HEADER: HeaderName = HeaderName::from_static("x-pathname");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleDecision {
    /// Exempt path: no locale logic applies.
    Exempt,
    /// The path already carries a supported locale.
    PassThrough { locale: Locale },
    /// The path lacks a locale and must be prefixed.
    Redirect { locale: Locale, location: String },
}

/// Outcome of resolving one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub decision: LocaleDecision,
    /// Locale to persist in the preference cookie, if it must change.
    pub set_cookie: Option<Locale>,
}

pub fn is_exempt(path: &str) -> bool {
    EXEMPT_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Decide the effective locale for a request path and stored cookie value.
///
/// The URL locale always wins so shared links are never re-targeted. Without
/// one, a supported cookie value is used, then the default locale.
pub fn resolve(path: &str, cookie: Option<&str>) -> Resolution {
    if is_exempt(path) {
        return Resolution {
            decision: LocaleDecision::Exempt,
            set_cookie: None,
        };
    }

    let first_segment = path.split('/').nth(1).unwrap_or_default();

    if let Some(locale) = Locale::parse(first_segment) {
        let set_cookie = (cookie != Some(locale.code())).then_some(locale);
        return Resolution {
            decision: LocaleDecision::PassThrough { locale },
            set_cookie,
        };
    }

    let stored = cookie.and_then(Locale::parse);
    let locale = stored.unwrap_or_else(Locale::default_locale);
    let suffix = if path == "/" || path.is_empty() { "" } else { path };
    let location = format!("/{}{}", locale.code(), suffix);

    Resolution {
        decision: LocaleDecision::Redirect { locale, location },
        // An unsupported stored value is replaced as well as a missing one.
        set_cookie: stored.is_none().then_some(locale),
    }
}

/// axum middleware applying [`resolve`] to every request.
pub async fn resolve_locale(
    State(cookie): State<LocaleCookie>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let stored = cookie.read(request.headers());
    let resolution = resolve(&path, stored.as_deref());

    let mut response = match resolution.decision {
        LocaleDecision::Exempt => return next.run(request).await,
        LocaleDecision::PassThrough { locale } => {
            debug!("Locale {} taken from path {}", locale, path);
            let headers = request.headers_mut();
            headers.insert(LOCALE_HEADER, HeaderValue::from_static(locale.code()));
            if let Ok(value) = HeaderValue::from_str(&path) {
                headers.insert(PATHNAME_HEADER, value);
            }
            request.extensions_mut().insert(locale);
            next.run(request).await
        }
        LocaleDecision::Redirect { locale, location } => {
            let location = match request.uri().query() {
                Some(query) => format!("{}?{}", location, query),
                None => location,
            };
            debug!("Redirecting {} to {} (locale {})", path, location, locale);
            Redirect::temporary(&location).into_response()
        }
    };

    if let Some(locale) = resolution.set_cookie {
        match cookie.header_value(locale) {
            Some(value) => {
                response.headers_mut().append(SET_COOKIE, value);
            }
            None => warn!("Could not encode locale cookie for {}", locale),
        }
    }

    response
}

/// Locale of a page request, as stored by [`resolve_locale`].
///
/// Rejects with `404` when the request never passed through the resolver
/// with a locale segment, e.g. an exempt path that happens to match a page
/// route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedLocale(pub Locale);

#[async_trait]
impl<S> FromRequestParts<S> for ResolvedLocale
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Locale>()
            .copied()
            .map(ResolvedLocale)
            .ok_or(StatusCode::NOT_FOUND)
    }
}

/// Locale for requests outside the page routes: the `x-locale` header, then
/// the locale cookie, then the default locale.
pub fn request_locale(headers: &HeaderMap, cookie: &LocaleCookie) -> Locale {
    headers
        .get(&LOCALE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(Locale::parse)
        .or_else(|| cookie.read(headers).as_deref().and_then(Locale::parse))
        .unwrap_or_default()
}
