use anyhow::{Context, Result};
use std::time::Duration;

/// Page size used when `MAX_PAGE_SIZE_DEFAULT` is unset or invalid.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_LOCALE_COOKIE_NAME: &str = "app-language";

pub const DEFAULT_RECAPTCHA_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

#[derive(Debug, Clone)]
pub struct Config {
    // CMS
    pub cms_base_url: String,
    pub cms_api_token: Option<String>,
    pub max_page_size: u32,

    // Locale cookie
    pub locale_cookie_name: String,

    // Contact form
    pub email_service_url: Option<String>,
    pub request_timeout: Duration,
    pub recaptcha_secret_key: Option<String>,
    pub recaptcha_verify_url: String,
    pub test_mode: bool,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // CMS - base URL without trailing slash, token checked per request
            cms_base_url: env_any(&["CMS_BASE_URL", "STRAPI_PUBLIC_URL"])
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| "http://localhost:1337".to_string()),
            cms_api_token: env_any(&["CMS_API_TOKEN", "STRAPI_API_TOKEN"]),
            max_page_size: std::env::var("MAX_PAGE_SIZE_DEFAULT")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),

            locale_cookie_name: std::env::var("LOCALE_COOKIE_NAME")
                .ok()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOCALE_COOKIE_NAME.to_string()),

            // Contact form
            email_service_url: env_any(&["EMAIL_SERVICE_URL"]),
            request_timeout: Duration::from_secs(
                std::env::var("REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
            recaptcha_secret_key: env_any(&["RECAPTCHA_SECRET_KEY"]),
            recaptcha_verify_url: std::env::var("RECAPTCHA_VERIFY_URL")
                .unwrap_or_else(|_| DEFAULT_RECAPTCHA_VERIFY_URL.to_string()),
            test_mode: std::env::var("TEST_MODE")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),

            port: match std::env::var("PORT") {
                Ok(port) => port.parse().context("PORT must be a valid port number")?,
                Err(_) => 8080,
            },
        })
    }
}

/// First non-empty value among the given variable names.
fn env_any(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}
