//! HTTP surface: locale-prefixed page routes and the `/api` routes.

use crate::cms::CmsError;
use crate::config::Config;
use crate::contact::{submit_contact_form, ContactForm, ContactOutcome};
use crate::content::ContentService;
use crate::cookie::LocaleCookie;
use crate::i18n::Locale;
use crate::middleware::{request_locale, resolve_locale, ResolvedLocale};
use crate::pages;
use crate::query::{ContentType, QueryError};
use axum::{
    extract::{Path, Query, State},
    http::{header::CACHE_CONTROL, HeaderMap, HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub struct AppState {
    pub config: Config,
    pub content: ContentService,
    pub cookie: LocaleCookie,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let content = ContentService::from_config(&config);
        let cookie = LocaleCookie::new(config.locale_cookie_name.clone());
        Self {
            config,
            content,
            cookie,
        }
    }
}

pub type SharedState = Arc<AppState>;

/// Errors of the JSON content API, rendered as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Content not found")]
    NotFound,

    #[error("Unsupported locale: '{0}'")]
    UnsupportedLocale(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Content service unavailable")]
    Unavailable(#[from] CmsError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::UnsupportedLocale(_) | ApiError::Query(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Unavailable(e) = &self {
            error!("Error fetching from content API: {}", e);
        }
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ContentEnvelope<T> {
    #[serde(rename = "type")]
    content_type: &'static str,
    payload: T,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

pub fn build_router(state: SharedState) -> Router {
    let cookie = state.cookie.clone();

    Router::new()
        .route("/api/health", get(health))
        .route("/api/content/:content_type/:locale", get(content))
        .route("/api/content/:content_type/:locale/:title", get(blog_post_content))
        .route("/api/contact", post(contact))
        .route("/:locale", get(home_page))
        .route("/:locale/", get(home_page))
        .route("/:locale/travel-cards", get(travel_cards_page))
        .route("/:locale/blogs/:title", get(blog_post_page))
        .route("/:locale/about", get(about_page))
        .route("/:locale/privacy-policy", get(privacy_policy_page))
        .route("/:locale/search", get(search_page))
        .fallback(not_found)
        .layer(from_fn_with_state(cookie, resolve_locale))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to the configured port and serve until the process stops.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let port = config.port;
    let router = build_router(Arc::new(AppState::new(config)));

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}

/// `Cache-Control` header for content that may be served stale for `revalidate`.
pub fn cache_control(revalidate: Duration) -> HeaderValue {
    let value = format!(
        "public, s-maxage={}, stale-while-revalidate",
        revalidate.as_secs()
    );
    HeaderValue::from_str(&value).unwrap_or(HeaderValue::from_static("no-cache"))
}

fn api_locale(code: &str) -> Result<Locale, ApiError> {
    Locale::parse(code).ok_or_else(|| ApiError::UnsupportedLocale(code.to_string()))
}

fn envelope<T: Serialize>(
    content_type: ContentType,
    payload: Option<T>,
) -> Result<Response, ApiError> {
    let payload = payload.ok_or(ApiError::NotFound)?;
    let body = ContentEnvelope {
        content_type: content_type.slug(),
        payload,
    };
    Ok((
        [(CACHE_CONTROL, cache_control(content_type.revalidate()))],
        Json(body),
    )
        .into_response())
}

// ==================== API Handlers ====================

async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn content(
    State(state): State<SharedState>,
    Path((content_type, locale)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let content_type: ContentType = content_type.parse()?;
    let locale = api_locale(&locale)?;
    let service = &state.content;

    match content_type {
        ContentType::LandingPage => envelope(content_type, service.landing_page(locale).await?),
        ContentType::BlogList => {
            // Rows that all failed to map count as no content.
            let posts = service.blog_posts(locale).await?;
            envelope(content_type, posts.filter(|posts| !posts.is_empty()))
        }
        ContentType::AboutPage => envelope(content_type, service.about_page(locale).await?),
        ContentType::TravelMap => envelope(content_type, service.travel_map(locale).await?),
        ContentType::PrivacyPolicy => {
            envelope(content_type, service.privacy_policy(locale).await?)
        }
        ContentType::BlogDetail => Err(QueryError::MissingTitleFilter.into()),
    }
}

/// `/api/content/blog-posts/{locale}/{title}`; other types take no title.
async fn blog_post_content(
    State(state): State<SharedState>,
    Path((content_type, locale, title)): Path<(String, String, String)>,
) -> Result<Response, ApiError> {
    match content_type.parse::<ContentType>()? {
        ContentType::BlogList | ContentType::BlogDetail => {}
        _ => return Err(ApiError::NotFound),
    }
    let locale = api_locale(&locale)?;
    if title.trim().is_empty() {
        return Err(QueryError::MissingTitleFilter.into());
    }
    envelope(
        ContentType::BlogDetail,
        state.content.blog_post(locale, &title).await?,
    )
}

async fn contact(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Form(form): Form<ContactForm>,
) -> (StatusCode, Json<ContactOutcome>) {
    let locale = request_locale(&headers, &state.cookie);
    let outcome = submit_contact_form(&state.config, &form, locale).await;

    let status = match &outcome {
        ContactOutcome::Sent { .. } => StatusCode::OK,
        ContactOutcome::Invalid { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ContactOutcome::Failed { .. } => StatusCode::BAD_GATEWAY,
    };
    (status, Json(outcome))
}

// ==================== Page Handlers ====================

async fn home_page(
    State(state): State<SharedState>,
    ResolvedLocale(locale): ResolvedLocale,
) -> Json<pages::HomeView> {
    Json(pages::home(&state.content, locale).await)
}

async fn travel_cards_page(
    State(state): State<SharedState>,
    ResolvedLocale(locale): ResolvedLocale,
) -> Json<pages::TravelCardsView> {
    Json(pages::travel_cards(&state.content, locale).await)
}

async fn blog_post_page(
    State(state): State<SharedState>,
    ResolvedLocale(locale): ResolvedLocale,
    Path((_, title)): Path<(String, String)>,
) -> Json<pages::BlogPostView> {
    Json(pages::blog_post(&state.content, locale, &title).await)
}

async fn about_page(
    State(state): State<SharedState>,
    ResolvedLocale(locale): ResolvedLocale,
) -> Json<pages::AboutView> {
    Json(pages::about(&state.content, locale).await)
}

async fn privacy_policy_page(
    State(state): State<SharedState>,
    ResolvedLocale(locale): ResolvedLocale,
) -> Json<pages::PrivacyPolicyView> {
    Json(pages::privacy_policy(&state.content, locale).await)
}

async fn search_page(
    State(state): State<SharedState>,
    ResolvedLocale(locale): ResolvedLocale,
    Query(params): Query<SearchParams>,
) -> Json<pages::SearchView> {
    Json(pages::search(&state.content, locale, &params.q).await)
}
