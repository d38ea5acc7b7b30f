use crate::config::Config;
use crate::query::QueryDescriptor;
use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("CMS API token is missing. Please provide a valid CMS_API_TOKEN")]
    MissingToken,

    #[error("CMS request failed ({status}): {body}")]
    Status { status: StatusCode, body: String },

    #[error("Failed to send request to CMS: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Failed to parse CMS response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Authenticated HTTP access to the CMS.
///
/// Holds no per-request state: the locale travels inside each query.
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl CmsClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cms_base_url.clone(), config.cms_api_token.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the content described by a query descriptor.
    pub async fn fetch(&self, descriptor: &QueryDescriptor) -> Result<serde_json::Value, CmsError> {
        self.get(
            descriptor.endpoint(),
            &descriptor.to_query_string(),
            descriptor.revalidate(),
        )
        .await
    }

    /// Issue one authenticated GET against `{base}/api{endpoint}?{query}`.
    ///
    /// `revalidate` is forwarded as a `max-age` hint for caches between
    /// this service and the CMS.
    pub async fn get(
        &self,
        endpoint: &str,
        query: &str,
        revalidate: Duration,
    ) -> Result<serde_json::Value, CmsError> {
        let url = if query.is_empty() {
            format!("{}/api{}", self.base_url, endpoint)
        } else {
            format!("{}/api{}?{}", self.base_url, endpoint, query)
        };

        let result = self.send(&url, revalidate).await;
        if let Err(e) = &result {
            error!("Error fetching from CMS API {}: {}", url, e);
        }
        result
    }

    async fn send(&self, url: &str, revalidate: Duration) -> Result<serde_json::Value, CmsError> {
        let token = self.token.as_deref().ok_or(CmsError::MissingToken)?;

        debug!(
            "Fetching from CMS API: {} (revalidate after {}s)",
            url,
            revalidate.as_secs()
        );

        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(CONTENT_TYPE, "application/json")
            .header(CACHE_CONTROL, format!("max-age={}", revalidate.as_secs()))
            .send()
            .await
            .map_err(CmsError::Transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CmsError::Status { status, body });
        }

        response.json().await.map_err(CmsError::Decode)
    }
}
